//! Logging helpers for model output and other untrusted text.
//!
//! Model replies are multi-line and can be very long; these helpers keep each
//! log record on one line and cap its size.

use std::fmt::Write;

/// Default character budget for a logged preview.
pub const DEFAULT_PREVIEW_CHARS: usize = 300;

/// Escape a string for single-line logging, truncated to [`DEFAULT_PREVIEW_CHARS`].
pub fn escape_log(s: &str) -> String {
    escape_log_with_limit(s, DEFAULT_PREVIEW_CHARS)
}

/// Escape `s` for a single log line, keeping at most `max_chars` characters.
///
/// Newlines, carriage returns, tabs and backslashes become their escaped
/// forms; other control characters become `\xNN`. Truncation appends `…`.
pub fn escape_log_with_limit(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= max_chars {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// One-line summary of a raw model reply: its length plus an escaped preview.
pub fn response_preview(raw: &str) -> String {
    format!("{} chars: {}", raw.chars().count(), escape_log(raw))
}
