//! Wiring for a single scan: two pumps, one renderer, one exit status.

use std::future::Future;
use std::io::{self, Write};
use std::process::ExitStatus;

use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::RunError;
use crate::events::StreamKind;
use crate::pump::pump;
use crate::render::{RenderOutcome, Renderer};

/// Capacity of the event channel shared by both pumps.
pub const EVENT_CHANNEL_CAPACITY: usize = 10;

/// One pump per scanner stream.
pub const PUMP_COUNT: usize = 2;

/// One slot per pump so neither ever waits to report completion.
pub const COMPLETION_CHANNEL_CAPACITY: usize = PUMP_COUNT;

/// Exit status used when the scanner's own status is unavailable.
pub const GENERIC_FAILURE: i32 = 1;

/// Result of a completed run.
#[derive(Debug)]
pub struct RunSummary<W> {
    /// The scanner's exit code, to be used verbatim as ours.
    pub exit_code: i32,
    /// Completion signals in the order they arrived.
    pub completions: Vec<StreamKind>,
    pub render: RenderOutcome<W>,
}

/// Drive one scan to completion.
///
/// Starts a pump for each stream and the renderer, waits until both pumps
/// have signalled completion, then awaits `wait` for the scanner's exit.
/// The renderer is joined last; by then both senders are gone, so it only
/// drains what is still buffered.
pub async fn run<O, E, F, W>(
    stdout: O,
    stderr: E,
    wait: F,
    renderer: Renderer<W>,
) -> Result<RunSummary<W>, RunError>
where
    O: AsyncRead + Unpin + Send + 'static,
    E: AsyncRead + Unpin + Send + 'static,
    F: Future<Output = io::Result<ExitStatus>>,
    W: Write + Send + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let (done_tx, mut done_rx) = mpsc::channel(COMPLETION_CHANNEL_CAPACITY);

    let stdout_task = tokio::spawn(pump(
        stdout,
        StreamKind::Stdout,
        event_tx.clone(),
        done_tx.clone(),
    ));
    let stderr_task = tokio::spawn(pump(stderr, StreamKind::Stderr, event_tx, done_tx));
    let render_task = tokio::spawn(renderer.run(event_rx));

    let mut completions = Vec::with_capacity(PUMP_COUNT);
    while completions.len() < PUMP_COUNT {
        // `None` means a pump died without signalling; its join below reports why.
        let Some(stream) = done_rx.recv().await else {
            break;
        };
        debug!(%stream, "stream completed");
        completions.push(stream);
    }

    let status = wait.await;

    let stdout_stats = stdout_task.await.map_err(RunError::Pump)?;
    let stderr_stats = stderr_task.await.map_err(RunError::Pump)?;
    debug!(?stdout_stats, ?stderr_stats, "both pumps joined");

    let render = render_task.await?;
    let status = status.map_err(RunError::Wait)?;
    let exit_code = exit_code(status);
    debug!(exit_code, "scanner exited");

    Ok(RunSummary {
        exit_code,
        completions,
        render,
    })
}

/// Map a process status to the exit code we should exit with.
///
/// Normal exits pass through verbatim. A signal-terminated process maps to
/// the shell convention `128 + signal` on Unix.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    GENERIC_FAILURE
}
