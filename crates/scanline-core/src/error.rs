use thiserror::Error;

use crate::events::StreamKind;

/// Failures that end a stream pump early.
///
/// Neither variant is fatal to the run: the pump reports it on the error
/// display path and then treats the stream as exhausted.
#[derive(Debug, Error)]
pub enum PumpError {
    #[error("Error reading {stream} output: {source}")]
    Read {
        stream: StreamKind,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading {stream} output: line exceeds {limit} bytes")]
    LineTooLong { stream: StreamKind, limit: usize },
}

/// Failures of the orchestration itself, distinct from a non-zero scanner exit.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Error waiting for scanner: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Renderer task failed: {0}")]
    Renderer(#[from] tokio::task::JoinError),

    #[error("Stream pump task failed: {0}")]
    Pump(#[source] tokio::task::JoinError),
}

/// Problems loading a theme file.
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Failed to read theme file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid theme file: {0}")]
    Parse(#[from] yaml_serde::Error),

    #[error("Unknown color '{name}' for style '{token}'")]
    UnknownColor { token: String, name: String },
}
