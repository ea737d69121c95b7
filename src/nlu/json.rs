// src/nlu/json.rs
// Strict parse with salvage fallback for generative JSON output.

use serde_json::Value;

/// Parse model output that is supposed to be a JSON object.
///
/// Attempt a structured decode first; on failure, retry on the largest
/// brace-delimited substring (models like to wrap JSON in prose); on failure
/// again, give up with `None` so the caller can fall back to an empty
/// default. A parse error never escapes this module.
pub fn salvage_object(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value) if value.is_object() => Some(value),
        _ => None,
    }
}
