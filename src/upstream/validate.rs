//! # Upstream Payload Validation
//!
//! Structural checks applied to parsed upstream payloads before they are
//! trusted or cached. A violation produces `InvalidUpstreamShape` with the
//! offending field and the kind that was found, which handlers surface as a
//! 502 to signal "upstream contract violated" distinctly from transport
//! failure.

use crate::core::error::{GatewayError, GatewayResult};
use serde_json::Value;

/// Require `payload[field]` to be a JSON array and return a reference to it
pub fn require_array<'a>(payload: &'a Value, field: &str) -> GatewayResult<&'a Vec<Value>> {
    match payload.get(field) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(GatewayError::shape(field, "array", kind_of(other))),
        None => Err(GatewayError::shape(field, "array", "missing")),
    }
}

/// Name of the JSON kind of a value, for error messages
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_array_field() {
        let payload = json!({"results": [{"id": 1}, {"id": 2}]});
        let results = require_array(&payload, "results").unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_accepts_empty_array() {
        let payload = json!({"genres": []});
        assert!(require_array(&payload, "genres").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_array_field() {
        let payload = json!({"results": 42});
        let err = require_array(&payload, "results").unwrap_err();

        match err {
            GatewayError::InvalidUpstreamShape {
                field,
                expected,
                found,
            } => {
                assert_eq!(field, "results");
                assert_eq!(expected, "array");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_missing_field() {
        let payload = json!({"status_message": "Invalid API key"});
        let err = require_array(&payload, "results").unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let payload = json!("oops");
        assert!(require_array(&payload, "results").is_err());
    }
}
