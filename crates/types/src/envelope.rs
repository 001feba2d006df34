//! The backend's uniform response wrapper.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Status value that marks a successful envelope.
pub const STATUS_SUCCESS: &str = "success";

/// `{status, code, message, data}` as returned by every backend endpoint.
///
/// Only `status == "success"` counts as success, whatever the HTTP status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_code")]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    /// Parse an envelope from a JSON value, returning `None` if the value is
    /// not an object shaped like one.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

// Some backends send numeric codes as strings ("409"); anything else non-numeric is dropped.
fn lenient_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let env: Envelope =
            serde_json::from_value(json!({"status": "success", "data": {"id": 1}})).unwrap();
        assert!(env.is_success());
        assert_eq!(env.data, Some(json!({"id": 1})));
        assert!(env.code.is_none());
    }

    #[test]
    fn test_error_envelope() {
        let env: Envelope = serde_json::from_value(
            json!({"status": "error", "code": 409, "message": "Duplicate"}),
        )
        .unwrap();
        assert!(!env.is_success());
        assert_eq!(env.code, Some(409));
        assert_eq!(env.message.as_deref(), Some("Duplicate"));
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let env: Envelope = serde_json::from_value(json!({"status": "SUCCESS"})).unwrap();
        assert!(!env.is_success());
    }

    #[test]
    fn test_missing_status_is_failure() {
        let env: Envelope = serde_json::from_value(json!({"data": [1, 2]})).unwrap();
        assert!(!env.is_success());
    }

    #[test]
    fn test_string_code() {
        let env: Envelope =
            serde_json::from_value(json!({"status": "error", "code": "422"})).unwrap();
        assert_eq!(env.code, Some(422));

        let env: Envelope =
            serde_json::from_value(json!({"status": "error", "code": "E_DUP"})).unwrap();
        assert!(env.code.is_none());
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Envelope::from_value(&json!("plain text")).is_none());
        assert!(Envelope::from_value(&json!([1])).is_none());
        assert!(Envelope::from_value(&json!({"status": "success"})).is_some());
    }
}
