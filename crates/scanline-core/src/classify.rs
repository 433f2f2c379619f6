//! Pure line classification.
//!
//! Maps one line of scanner output to at most one [`Event`]. The rules are
//! checked in priority order and the first match wins; a line carrying a
//! `Stats:` or `Timing:` marker that does not fit the expected shape is
//! dropped rather than passed through.

use std::sync::LazyLock;

use regex::Regex;

use crate::events::{Event, PortInfo, StreamKind};

/// Banner printed by the scanner at startup; never displayed.
pub const START_BANNER: &str = "Starting Nmap";

pub const STATS_MARKER: &str = "Stats:";

pub const TIMING_MARKER: &str = "Timing:";

/// Captures: (1) free-text progress snapshot.
pub static STATS_RE: LazyLock<Regex> = LazyLock::new(|| {
    // safety: this regex is valid and tested
    Regex::new(r"Stats: (.+)").expect("valid regex")
});

/// Captures: (1) percent done, (2) ETC clock time, (3) remaining duration.
pub static TIMING_RE: LazyLock<Regex> = LazyLock::new(|| {
    // safety: this regex is valid and tested
    Regex::new(r"About (\d+\.\d+)% done; ETC: (\d+:\d+) \((.+) remaining\)").expect("valid regex")
});

pub static WARNING_RE: LazyLock<Regex> = LazyLock::new(|| {
    // safety: this regex is valid and tested
    Regex::new(r"(?i)warning|caution").expect("valid regex")
});

/// Captures: (1) port number, (2) protocol, (3) service name.
pub static OPEN_PORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // safety: this regex is valid and tested
    Regex::new(r"(\d+)/(tcp|udp)\s+open\s+(.+)").expect("valid regex")
});

/// Classify a single line read from `stream`.
///
/// Returns `None` for suppressed lines (the start banner and malformed
/// stats/timing lines).
pub fn classify(line: &str, stream: StreamKind) -> Option<Event> {
    if line.contains(START_BANNER) {
        return None;
    }

    if line.contains(STATS_MARKER) {
        return parse_stats(line);
    }

    if line.contains(TIMING_MARKER) {
        return parse_timing(line);
    }

    Some(Event::Output {
        text: line.to_string(),
        from_stderr: stream.is_stderr(),
        is_warning: WARNING_RE.is_match(line),
        open_port: parse_open_port(line),
    })
}

fn parse_stats(line: &str) -> Option<Event> {
    let caps = STATS_RE.captures(line)?;
    Some(Event::Stats {
        info: caps[1].to_string(),
    })
}

fn parse_timing(line: &str) -> Option<Event> {
    let caps = TIMING_RE.captures(line)?;
    Some(Event::Timing {
        percent: parse_percent(&caps[1]),
        etc: caps[2].to_string(),
        remaining: caps[3].to_string(),
    })
}

/// Parse a percentage capture, normalizing anything unparsable to `0.0`.
pub fn parse_percent(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

/// Extract port, protocol and service from an open-port result line.
pub fn parse_open_port(line: &str) -> Option<PortInfo> {
    let caps = OPEN_PORT_RE.captures(line)?;
    Some(PortInfo {
        port: caps[1].to_string(),
        protocol: caps[2].to_string(),
        service: caps[3].to_string(),
    })
}
