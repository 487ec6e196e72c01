//! Reusable formatting utilities for log output
//!
//! Values echoed to the log (payloads, signed URLs, pasted keys) can be
//! arbitrarily long, so everything here truncates on character boundaries.

use serde_json::Value;

/// Horizontal rule separating traced requests in the log
pub const RULE: &str = "────────────────────────────────────────────────────────";

/// Cut `value` to at most `max_chars` characters.
///
/// Returns the prefix and whether anything was cut off.
pub fn truncate_chars(value: &str, max_chars: usize) -> (&str, bool) {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => (&value[..idx], true),
        None => (value, false),
    }
}

/// Truncate `value` and append `...` when it was cut.
pub fn preview(value: &str, max_chars: usize) -> String {
    let (head, truncated) = truncate_chars(value, max_chars);
    if truncated {
        format!("{}...", head)
    } else {
        head.to_string()
    }
}

/// Compact JSON rendering of `value`, truncated to `max_chars`.
pub fn json_preview(value: &Value, max_chars: usize) -> String {
    preview(&value.to_string(), max_chars)
}

/// Pretty-printed JSON rendering of `value`, truncated to `max_chars`.
pub fn json_preview_pretty(value: &Value, max_chars: usize) -> String {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    preview(&rendered, max_chars)
}

/// Render an optional value, substituting a placeholder when absent.
pub fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value.unwrap_or(placeholder)
}
