//! Live status line state and formatting.

use crate::theme::Theme;

/// Number of cells in the progress bar.
pub const BAR_WIDTH: usize = 20;

/// Most recent progress values seen by the renderer.
///
/// Owned by the renderer task alone; only stats and timing events mutate it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub last_stats: String,
    pub last_percent: f64,
    pub last_etc: String,
    pub last_remaining: String,
}

impl DisplayState {
    pub fn update_stats(&mut self, info: String) {
        self.last_stats = info;
    }

    pub fn update_timing(&mut self, percent: f64, etc: String, remaining: String) {
        self.last_percent = percent;
        self.last_etc = etc;
        self.last_remaining = remaining;
    }

    /// Nothing is drawn until real progress has been reported.
    pub fn has_progress(&self) -> bool {
        !self.last_stats.is_empty() || self.last_percent != 0.0
    }

    /// Format the status line, or `None` when there is nothing to show yet.
    ///
    /// The result starts with the theme's erase sequence and has no trailing
    /// newline, so the next write can overwrite it in place.
    pub fn status_line(&self, theme: &Theme) -> Option<String> {
        if !self.has_progress() {
            return None;
        }

        let mut line = theme.erase_line.clone();
        let show_percent = self.last_percent > 0.0;

        if show_percent {
            line.push_str(&progress_bar(self.last_percent, theme));
            line.push(' ');
            line.push_str(&theme.percent.paint(&format!("{:.2}%", self.last_percent)));

            if !self.last_etc.is_empty() && !self.last_remaining.is_empty() {
                line.push_str(&format!(
                    " ETC: {} ({} remaining)",
                    theme.etc.paint(&self.last_etc),
                    theme.remaining.paint(&self.last_remaining),
                ));
            }
        }

        if !self.last_stats.is_empty() {
            if show_percent {
                line.push_str(" | ");
            }
            line.push_str(&theme.stats.paint(&format!("Stats: {}", self.last_stats)));
        }

        Some(line)
    }
}

/// Number of completely filled bar cells for `percent`.
pub fn filled_cells(percent: f64) -> usize {
    ((percent / 100.0) * BAR_WIDTH as f64).floor().max(0.0) as usize
}

/// Render a `[====>     ]` bar. The cell right after the filled run shows
/// the in-progress marker; at 100% there is no such cell.
pub fn progress_bar(percent: f64, theme: &Theme) -> String {
    let filled = filled_cells(percent);
    let fill = theme.bar_fill_char.to_string();
    let head = theme.bar_head_char.to_string();

    let mut bar = String::from("[");
    for i in 0..BAR_WIDTH {
        if i < filled {
            bar.push_str(&theme.bar_fill.paint(&fill));
        } else if i == filled {
            bar.push_str(&theme.bar_head.paint(&head));
        } else {
            bar.push(' ');
        }
    }
    bar.push(']');
    bar
}
