mod cli;
mod launcher;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use scanline_core::orchestrator::GENERIC_FAILURE;
use scanline_core::render::Renderer;
use scanline_core::theme::Theme;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Held until exit so buffered log records are flushed.
    let log_guard = cli.log_dir.as_deref().map(logging::init);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "ERROR".red().bold(), e);
            GENERIC_FAILURE
        }
    };

    drop(log_guard);
    std::process::exit(code);
}

/// Launch the scanner and return the exit code to terminate with.
async fn run(cli: &Cli) -> Result<i32> {
    let theme = load_theme(cli)?;
    let args = launcher::scanner_args(&cli.scanner_args);
    let child = launcher::spawn_scanner(&cli.scanner, &args)?;

    let renderer = Renderer::new(std::io::stdout(), theme);
    let summary = launcher::supervise(child, renderer).await?;
    Ok(summary.exit_code)
}

fn load_theme(cli: &Cli) -> Result<Theme> {
    let base = if cli.no_color {
        Theme::plain()
    } else {
        Theme::default()
    };

    match cli.theme {
        Some(ref path) => Theme::load(path, base)
            .with_context(|| format!("Failed to load theme {}", path.display())),
        None => Ok(base),
    }
}
