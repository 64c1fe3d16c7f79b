//! Whole-input JSON aggregation.
//!
//! In JSON mode the entire input stream is one document. A top-level
//! array fans out to one logical line per element; any other top-level
//! value (object, string, number, boolean, null) is exactly one logical
//! line. The fan-out is one level deep only: arrays nested inside a
//! top-level array are re-serialized, not flattened.

use serde_json::Value;
use tracing::debug;

/// Split captured input into logical lines.
///
/// Non-string values are re-emitted using their canonical JSON
/// serialization; string values are emitted bare. When the input is not
/// a valid JSON document the same captured text is reinterpreted as
/// newline-delimited plain text, with empty lines dropped. Parse failure
/// is recovered here, never surfaced.
pub fn fan_out(input: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Array(items)) => items.iter().map(logical_line).collect(),
        Ok(value) => vec![logical_line(&value)],
        Err(error) => {
            debug!(%error, "input is not a JSON document, splitting into plain lines");
            input
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()
        }
    }
}

fn logical_line(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
