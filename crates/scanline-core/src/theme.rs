use std::path::Path;
use std::str::FromStr;

use colored::{Color, Colorize};
use serde::Deserialize;

use crate::error::ThemeError;

/// Carriage return followed by erase-to-end-of-line.
pub const ANSI_ERASE_LINE: &str = "\r\x1b[K";

/// A named piece of styling: an optional foreground color and boldness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleToken {
    pub color: Option<Color>,
    pub bold: bool,
}

impl StyleToken {
    pub const PLAIN: StyleToken = StyleToken {
        color: None,
        bold: false,
    };

    pub const fn fg(color: Color) -> Self {
        Self {
            color: Some(color),
            bold: false,
        }
    }

    pub const fn bold() -> Self {
        Self {
            color: None,
            bold: true,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.color.is_none() && !self.bold
    }

    /// Apply this style to `text`.
    ///
    /// Plain tokens return the text untouched; otherwise `colored` decides
    /// whether escape codes are emitted (honoring `NO_COLOR` and overrides).
    pub fn paint(&self, text: &str) -> String {
        if self.is_plain() {
            return text.to_string();
        }
        let mut styled = text.normal();
        if let Some(color) = self.color {
            styled = styled.color(color);
        }
        if self.bold {
            styled = styled.bold();
        }
        styled.to_string()
    }
}

/// Semantic styling for everything the renderer writes.
///
/// Rendering code references these fields instead of hardcoding colors, so a
/// non-ANSI target only needs a different `Theme`.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Sequence that returns the cursor to the line start and clears the line.
    pub erase_line: String,
    /// Filled cells of the progress bar.
    pub bar_fill: StyleToken,
    /// The in-progress cell of the progress bar.
    pub bar_head: StyleToken,
    pub bar_fill_char: char,
    pub bar_head_char: char,
    pub percent: StyleToken,
    pub etc: StyleToken,
    pub remaining: StyleToken,
    pub stats: StyleToken,
    /// Lines matching the warning pattern.
    pub warning: StyleToken,
    /// `port/protocol` of an open-port line.
    pub port: StyleToken,
    /// Service name of an open-port line.
    pub service: StyleToken,
    /// Any other stderr line.
    pub error: StyleToken,
}

impl Default for Theme {
    /// ANSI palette: green progress, yellow ETC and warnings, cyan remaining
    /// time, blue stats, red stderr.
    fn default() -> Self {
        Self {
            erase_line: ANSI_ERASE_LINE.to_string(),
            bar_fill: StyleToken::fg(Color::Green),
            bar_head: StyleToken::fg(Color::Yellow),
            bar_fill_char: '=',
            bar_head_char: '>',
            percent: StyleToken::fg(Color::Green),
            etc: StyleToken::fg(Color::Yellow),
            remaining: StyleToken::fg(Color::Cyan),
            stats: StyleToken::fg(Color::Blue),
            warning: StyleToken::fg(Color::Yellow),
            port: StyleToken::fg(Color::Green),
            service: StyleToken::bold(),
            error: StyleToken::fg(Color::Red),
        }
    }
}

impl Theme {
    /// Same layout as the default theme with every style token disabled.
    pub fn plain() -> Self {
        Self {
            bar_fill: StyleToken::PLAIN,
            bar_head: StyleToken::PLAIN,
            percent: StyleToken::PLAIN,
            etc: StyleToken::PLAIN,
            remaining: StyleToken::PLAIN,
            stats: StyleToken::PLAIN,
            warning: StyleToken::PLAIN,
            port: StyleToken::PLAIN,
            service: StyleToken::PLAIN,
            error: StyleToken::PLAIN,
            ..Self::default()
        }
    }

    /// Load a YAML theme file on top of `base`.
    pub fn load(path: &Path, base: Theme) -> Result<Theme, ThemeError> {
        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content, base)
    }

    /// Parse YAML overrides on top of `base`. Missing keys keep the base value.
    pub fn from_yaml(yaml: &str, base: Theme) -> Result<Theme, ThemeError> {
        let file: ThemeFile = yaml_serde::from_str(yaml)?;
        file.apply(base)
    }
}

/// On-disk theme format. Every field is optional.
///
/// ```yaml
/// eraseLine: "\r\e[K"
/// barFillChar: "#"
/// styles:
///   warning: { color: magenta, bold: true }
///   stats: { color: bright blue }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ThemeFile {
    #[serde(default)]
    erase_line: Option<String>,
    #[serde(default)]
    bar_fill_char: Option<char>,
    #[serde(default)]
    bar_head_char: Option<char>,
    #[serde(default)]
    styles: Styles,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Styles {
    bar_fill: Option<StyleSpec>,
    bar_head: Option<StyleSpec>,
    percent: Option<StyleSpec>,
    etc: Option<StyleSpec>,
    remaining: Option<StyleSpec>,
    stats: Option<StyleSpec>,
    warning: Option<StyleSpec>,
    port: Option<StyleSpec>,
    service: Option<StyleSpec>,
    error: Option<StyleSpec>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleSpec {
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    bold: bool,
}

impl StyleSpec {
    fn resolve(&self, token: &str) -> Result<StyleToken, ThemeError> {
        let color = match self.color.as_deref() {
            None | Some("none") | Some("") => None,
            Some(name) => Some(Color::from_str(name).map_err(|_| ThemeError::UnknownColor {
                token: token.to_string(),
                name: name.to_string(),
            })?),
        };
        Ok(StyleToken {
            color,
            bold: self.bold,
        })
    }
}

impl ThemeFile {
    fn apply(self, mut theme: Theme) -> Result<Theme, ThemeError> {
        if let Some(erase_line) = self.erase_line {
            theme.erase_line = erase_line;
        }
        if let Some(c) = self.bar_fill_char {
            theme.bar_fill_char = c;
        }
        if let Some(c) = self.bar_head_char {
            theme.bar_head_char = c;
        }

        let styles = self.styles;
        let slots: [(&str, Option<StyleSpec>, &mut StyleToken); 10] = [
            ("barFill", styles.bar_fill, &mut theme.bar_fill),
            ("barHead", styles.bar_head, &mut theme.bar_head),
            ("percent", styles.percent, &mut theme.percent),
            ("etc", styles.etc, &mut theme.etc),
            ("remaining", styles.remaining, &mut theme.remaining),
            ("stats", styles.stats, &mut theme.stats),
            ("warning", styles.warning, &mut theme.warning),
            ("port", styles.port, &mut theme.port),
            ("service", styles.service, &mut theme.service),
            ("error", styles.error, &mut theme.error),
        ];
        for (name, spec, slot) in slots {
            if let Some(spec) = spec {
                *slot = spec.resolve(name)?;
            }
        }

        Ok(theme)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_token_paints_nothing() {
        assert_eq!(StyleToken::PLAIN.paint("80/tcp"), "80/tcp");
        assert!(StyleToken::PLAIN.is_plain());
        assert!(!StyleToken::bold().is_plain());
    }

    #[test]
    fn test_colored_token_keeps_text() {
        let _colors = test_support::force_colors();
        let painted = StyleToken::fg(Color::Red).paint("boom");
        assert!(painted.contains("boom"));
        assert_ne!(painted, "boom");
    }

    #[test]
    fn test_plain_theme_keeps_layout() {
        let theme = Theme::plain();
        assert_eq!(theme.erase_line, ANSI_ERASE_LINE);
        assert_eq!(theme.bar_fill_char, '=');
        assert_eq!(theme.bar_head_char, '>');
        assert!(theme.warning.is_plain());
        assert!(theme.service.is_plain());
    }

    #[test]
    fn test_default_theme_palette() {
        let theme = Theme::default();
        assert_eq!(theme.warning.color, Some(Color::Yellow));
        assert_eq!(theme.error.color, Some(Color::Red));
        assert_eq!(theme.stats.color, Some(Color::Blue));
        assert!(theme.service.bold);
    }

    #[test]
    fn test_from_yaml_overrides_selected_tokens() {
        let yaml = r##"
barFillChar: "#"
styles:
  warning:
    color: magenta
    bold: true
  stats:
    color: bright blue
"##;
        let theme = Theme::from_yaml(yaml, Theme::default()).unwrap();
        assert_eq!(theme.bar_fill_char, '#');
        assert_eq!(theme.bar_head_char, '>');
        assert_eq!(
            theme.warning,
            StyleToken {
                color: Some(Color::Magenta),
                bold: true
            }
        );
        assert_eq!(theme.stats.color, Some(Color::BrightBlue));
        assert_eq!(theme.error, Theme::default().error);
    }

    #[test]
    fn test_from_yaml_none_clears_color() {
        let yaml = "styles:\n  error:\n    color: none\n";
        let theme = Theme::from_yaml(yaml, Theme::default()).unwrap();
        assert!(theme.error.is_plain());
    }

    #[test]
    fn test_from_yaml_erase_line_for_dumb_terminals() {
        let yaml = "eraseLine: \"\\n\"\n";
        let theme = Theme::from_yaml(yaml, Theme::plain()).unwrap();
        assert_eq!(theme.erase_line, "\n");
    }

    #[test]
    fn test_from_yaml_rejects_unknown_color() {
        let yaml = "styles:\n  port:\n    color: chartreuse-ish\n";
        let err = Theme::from_yaml(yaml, Theme::default()).unwrap_err();
        assert!(matches!(
            err,
            ThemeError::UnknownColor { ref token, .. } if token == "port"
        ));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_keys() {
        let err = Theme::from_yaml("colour: red\n", Theme::default()).unwrap_err();
        assert!(matches!(err, ThemeError::Parse(_)));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.yaml");
        std::fs::write(&path, "barHeadChar: \"*\"\n").unwrap();

        let theme = Theme::load(&path, Theme::plain()).unwrap();
        assert_eq!(theme.bar_head_char, '*');
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Theme::load(&dir.path().join("nope.yaml"), Theme::default()).unwrap_err();
        assert!(matches!(err, ThemeError::Io { .. }));
    }
}
