//! String utilities for the domain layer.

/// Cut a string down to at most `max_chars` characters (UTF-8 safe).
///
/// Returns a borrowed prefix; no ellipsis is appended. Used for passage
/// trimming where the cut text is shown to the model verbatim.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Truncate a string for display, appending "..." when shortened.
///
/// `max_chars` counts characters, including the ellipsis.
pub fn preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", truncate_chars(s, max_chars.saturating_sub(3)))
    }
}
