use std::fmt;

/// Which of the scanner's output streams a line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn is_stderr(self) -> bool {
        matches!(self, StreamKind::Stderr)
    }

    pub fn label(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An open port reported by a scan result line such as `80/tcp open http`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub port: String,
    pub protocol: String,
    pub service: String,
}

/// Events emitted by the stream pumps, one per classified line.
///
/// Stats and timing events only update the live status line; output events
/// are written permanently to the terminal scrollback.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Periodic progress snapshot (the text after `Stats: `).
    Stats { info: String },
    /// Completion estimate from a `Timing:` line.
    Timing {
        percent: f64,
        etc: String,
        remaining: String,
    },
    /// Any other line, passed through for display.
    Output {
        text: String,
        from_stderr: bool,
        is_warning: bool,
        open_port: Option<PortInfo>,
    },
}

impl Event {
    /// Build a plain stderr output event that bypasses classification.
    ///
    /// Used for diagnostics produced by the pipeline itself, e.g. read errors.
    pub fn error_line(text: impl Into<String>) -> Self {
        Event::Output {
            text: text.into(),
            from_stderr: true,
            is_warning: false,
            open_port: None,
        }
    }
}
