//! Size limits on tool output fed back to the model.
//!
//! A single `ps aux` or `cat` of a log can be far larger than a small local
//! model's context window, so every tool result is capped before it is
//! appended to the conversation.

use serde_json::Value;

/// Maximum bytes of a single tool result.
pub const MAX_TOOL_RESULT_BYTES: usize = 65_536;

/// Cap `value` so its text form fits within `max_bytes`.
///
/// Strings are cut at a character boundary and given a suffix recording the
/// original size. Other values are serialized first and treated the same way.
pub fn truncate_result(value: Value, max_bytes: usize) -> Value {
    match value {
        Value::String(s) => Value::String(truncate_text(s, max_bytes)),
        other => {
            let text = other.to_string();
            if text.len() <= max_bytes {
                other
            } else {
                Value::String(truncate_text(text, max_bytes))
            }
        }
    }
}

/// Text sent to the model for a tool result: strings verbatim, anything
/// else as compact JSON.
pub fn result_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate_text(s: String, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s;
    }
    let suffix = format!("... [truncated, original size: {} bytes]", s.len());
    let mut cut = max_bytes.saturating_sub(suffix.len());
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{suffix}", &s[..cut])
}
