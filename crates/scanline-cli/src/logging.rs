use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize file-based logging with daily log rotation.
///
/// Only installed when `--log-dir` is given: any record written to the
/// terminal would land between the status line and its erase sequence and
/// corrupt the in-place redraw. Logs go to `scanline.YYYY-MM-DD` files inside
/// `dir`. The level defaults to `debug` and can be overridden via
/// `SCANLINE_LOG` or `RUST_LOG`.
///
/// Returns a [`WorkerGuard`] that **must** be held until shutdown so buffered
/// records are flushed.
pub fn init(dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(dir, "scanline");

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_env("SCANLINE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .with(env_filter)
        .init();

    guard
}
