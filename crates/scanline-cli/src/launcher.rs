use std::io::Write;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};
use tracing::info;

use scanline_core::orchestrator::{self, RunSummary};
use scanline_core::render::Renderer;

/// Scanner flag that controls how often progress lines are printed.
pub const STATS_EVERY_FLAG: &str = "--stats-every";

/// Interval requested when the user did not pick one.
pub const DEFAULT_STATS_EVERY: &str = "--stats-every=1s";

/// Build the scanner argument list, requesting periodic stats unless the
/// user already passed their own `--stats-every`.
pub fn scanner_args(user_args: &[String]) -> Vec<String> {
    let has_stats_every = user_args.iter().any(|a| a.starts_with(STATS_EVERY_FLAG));

    let mut args = Vec::with_capacity(user_args.len() + 1);
    if !has_stats_every {
        args.push(DEFAULT_STATS_EVERY.to_string());
    }
    args.extend(user_args.iter().cloned());
    args
}

/// Start the scanner with both output streams piped.
pub fn spawn_scanner(program: &str, args: &[String]) -> Result<Child> {
    info!(program, ?args, "starting scanner");
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to start scanner '{program}'"))
}

/// Stream a spawned scanner through the renderer until it exits.
pub async fn supervise<W>(mut child: Child, renderer: Renderer<W>) -> Result<RunSummary<W>>
where
    W: Write + Send + 'static,
{
    let stdout = child.stdout.take().context("Scanner stdout was not piped")?;
    let stderr = child.stderr.take().context("Scanner stderr was not piped")?;

    let summary = orchestrator::run(stdout, stderr, async move { child.wait().await }, renderer)
        .await?;
    info!(exit_code = summary.exit_code, "scan finished");
    Ok(summary)
}
