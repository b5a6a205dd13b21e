//! Line formats written to the session log
//!
//! - normal: `[HH:MM:SS.mmm] [LEVEL] message`
//! - collapsed repeats: `[Repeated N times] [LEVEL] message`
//! - session start banner and `=` horizontal rules

use chrono::{DateTime, Local};

use super::level::LogLevel;

/// Width of a horizontal rule in characters
pub const RULE_WIDTH: usize = 50;

/// Format a message with its level tag, without timestamp
///
/// This is the form compared for duplicate collapsing.
pub fn tagged(level: LogLevel, message: &str) -> String {
    format!("[{}] {}", level.as_str(), message)
}

/// Prefix a tagged message with a millisecond wall-clock timestamp
pub fn timestamped(at: DateTime<Local>, tagged: &str) -> String {
    format!("[{}] {}", at.format("%H:%M:%S%.3f"), tagged)
}

/// Summary line for a message that occurred `occurrences` times in a row
pub fn repeated(occurrences: u32, tagged: &str) -> String {
    format!("[Repeated {} times] {}", occurrences, tagged)
}

/// Message announcing the start of a session
pub fn session_banner(at: DateTime<Local>) -> String {
    format!(
        "=== Mod session started: {} ===",
        at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// A plain horizontal rule
pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// A horizontal rule with `title` centered in it
///
/// Blank titles give a plain rule. Titles too wide to pad fall back to `= title =`.
pub fn titled_rule(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return rule();
    }

    let message_length = title.chars().count() as isize + 2;
    let padding = (RULE_WIDTH as isize - message_length) / 2;
    let trailing = RULE_WIDTH as isize - message_length - padding;
    // Integer division rounds toward zero, so a one-over title gives padding 0 and trailing -1
    if padding < 0 || trailing < 0 {
        return format!("= {} =", title);
    }

    format!(
        "{} {} {}",
        "=".repeat(padding as usize),
        title,
        "=".repeat(trailing as usize)
    )
}
