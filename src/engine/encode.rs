// src/engine/encode.rs

use crate::engine::ExecutionResult;

/// Emitted if serialisation ever fails, so the wire always carries JSON.
const ENCODE_FAILURE: &str = r#"{"success":false,"message":"Failed to encode result"}"#;

/// Serialise a result into the compact wire object.
///
/// Field order follows the struct: `success`, `message`, then `data` when
/// present. `data` is embedded as JSON, never as an escaped string.
pub fn encode(result: &ExecutionResult) -> String {
    match serde_json::to_string(result) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::error!(error = %err, "failed to encode execution result");
            ENCODE_FAILURE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn failure_omits_data() {
        let encoded = encode(&ExecutionResult::failure("Invalid JSON"));
        assert_eq!(encoded, r#"{"success":false,"message":"Invalid JSON"}"#);
    }

    #[test]
    fn data_is_nested_not_escaped() {
        let result = ExecutionResult::ok("File created: /tmp/a \"b\"", json!({"path": "/tmp/a \"b\""}));
        let encoded = encode(&result);

        assert_eq!(
            encoded,
            r#"{"success":true,"message":"File created: /tmp/a \"b\"","data":{"path":"/tmp/a \"b\""}}"#
        );

        let parsed: Value = serde_json::from_str(&encoded).expect("valid json");
        assert!(parsed["data"].is_object());
        assert_eq!(parsed["data"]["path"], "/tmp/a \"b\"");
    }

    #[test]
    fn null_data_is_treated_as_empty() {
        let result = ExecutionResult {
            success: true,
            message: "done".into(),
            data: Some(Value::Null),
        };
        assert_eq!(encode(&result), r#"{"success":true,"message":"done"}"#);
    }
}
