use std::io::{self, Write};

use tokio::sync::mpsc::Receiver;
use tracing::{debug, warn};

use crate::events::{Event, PortInfo};
use crate::status::DisplayState;
use crate::theme::Theme;

/// Single consumer of the event channel.
///
/// Folds stats and timing events into its private [`DisplayState`] and keeps
/// a status line at the bottom of `out`. Permanent output lines are written
/// above it: the status line is erased, the line printed, and the status
/// line redrawn from the unchanged state.
pub struct Renderer<W: Write> {
    out: W,
    theme: Theme,
    state: DisplayState,
    status_visible: bool,
    output_lines: usize,
    redraws: usize,
    write_failed: bool,
}

/// What a finished renderer leaves behind.
#[derive(Debug)]
pub struct RenderOutcome<W> {
    pub out: W,
    pub state: DisplayState,
    /// Permanent lines written to the scrollback.
    pub output_lines: usize,
    /// Times a status line was actually drawn.
    pub redraws: usize,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self {
            out,
            theme,
            state: DisplayState::default(),
            status_visible: false,
            output_lines: 0,
            redraws: 0,
            write_failed: false,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Drain `rx` until every sender is dropped, then clear the status line.
    pub async fn run(mut self, mut rx: Receiver<Event>) -> RenderOutcome<W> {
        while let Some(event) = rx.recv().await {
            self.handle(event);
        }
        debug!(
            output_lines = self.output_lines,
            redraws = self.redraws,
            "event channel closed; renderer stopping"
        );
        self.finish()
    }

    /// Apply one event to the display.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Stats { info } => {
                self.state.update_stats(info);
                self.redraw();
            }
            Event::Timing {
                percent,
                etc,
                remaining,
            } => {
                self.state.update_timing(percent, etc, remaining);
                self.redraw();
            }
            Event::Output {
                text,
                from_stderr,
                is_warning,
                open_port,
            } => {
                let line = self.format_output(&text, from_stderr, is_warning, open_port.as_ref());
                let erase = self.theme.erase_line.clone();
                self.write(&erase);
                self.status_visible = false;
                self.write(&line);
                self.write("\n");
                self.output_lines += 1;
                self.redraw();
            }
        }
        self.flush();
    }

    /// Erase any visible status line and hand back the writer and state.
    pub fn finish(mut self) -> RenderOutcome<W> {
        if self.status_visible {
            let erase = self.theme.erase_line.clone();
            self.write(&erase);
            self.status_visible = false;
            self.flush();
        }
        RenderOutcome {
            out: self.out,
            state: self.state,
            output_lines: self.output_lines,
            redraws: self.redraws,
        }
    }

    /// Pick the presentation for a permanent line.
    ///
    /// Priority: warning, then open port, then stderr, then plain.
    fn format_output(
        &self,
        text: &str,
        from_stderr: bool,
        is_warning: bool,
        open_port: Option<&PortInfo>,
    ) -> String {
        if is_warning {
            self.theme.warning.paint(text)
        } else if let Some(port) = open_port {
            format!(
                "{} open {}",
                self.theme
                    .port
                    .paint(&format!("{}/{}", port.port, port.protocol)),
                self.theme.service.paint(&port.service),
            )
        } else if from_stderr {
            self.theme.error.paint(text)
        } else {
            text.to_string()
        }
    }

    fn redraw(&mut self) {
        if let Some(line) = self.state.status_line(&self.theme) {
            self.write(&line);
            self.status_visible = true;
            self.redraws += 1;
        }
    }

    fn write(&mut self, s: &str) {
        let result = self.out.write_all(s.as_bytes());
        self.note_failure(result);
    }

    fn flush(&mut self) {
        let result = self.out.flush();
        self.note_failure(result);
    }

    /// The renderer never fails the run; a broken terminal is logged once.
    fn note_failure(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            if !self.write_failed {
                warn!(error = %e, "failed to write to terminal");
                self.write_failed = true;
            }
        }
    }
}
