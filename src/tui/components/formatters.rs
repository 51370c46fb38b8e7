// Text formatters
//
// Shared formatting utilities for fitting catalog text into terminal cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to a display width, ending with an ellipsis when cut
///
/// Uses unicode display width (not byte length) so wide glyphs count as
/// two columns.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    // Leave room for the ellipsis (1 column)
    let target_width = max_width - 1;
    let mut current_width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > target_width {
            break;
        }
        current_width += char_width;
        out.push(c);
    }
    out.push('…');
    out
}

/// Date part of an RFC 3339 timestamp, or the raw value when unparsable
pub fn format_created(created_at: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(created_at) {
        Ok(ts) => ts.format("%Y-%m-%d").to_string(),
        Err(_) => created_at.to_string(),
    }
}
