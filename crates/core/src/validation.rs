//! Required-field presence checks for incoming JSON payloads.
//!
//! A field counts as present when its key exists in the payload object. Empty
//! strings, zero and `null` are all accepted here; type errors surface later
//! when the payload is deserialized into a record input.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced when a payload fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required keys are absent.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// An update carried no fields at all.
    #[error("No update data provided")]
    EmptyPayload,
}

/// Check that every key in `required` is present in `payload`.
///
/// Missing keys are reported in the order they appear in `required`.
///
/// # Errors
///
/// Returns `ValidationError::MissingFields` listing every absent key.
pub fn require(payload: &Map<String, Value>, required: &[&str]) -> Result<(), ValidationError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|field| !payload.contains_key(**field))
        .map(|field| (*field).to_owned())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

/// Reject an update payload with no keys.
///
/// # Errors
///
/// Returns `ValidationError::EmptyPayload` if `payload` is empty.
pub fn ensure_not_empty(payload: &Map<String, Value>) -> Result<(), ValidationError> {
    if payload.is_empty() {
        Err(ValidationError::EmptyPayload)
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_all_fields_present() {
        let payload = object(json!({"name": "Ann", "email": "a@x.com", "phone_number": "555-1"}));
        assert!(require(&payload, &["name", "email", "phone_number"]).is_ok());
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        let payload = object(json!({"email": "a@x.com"}));
        let err = require(&payload, &["name", "email", "phone_number"]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec!["name".into(), "phone_number".into()])
        );
        assert_eq!(err.to_string(), "Missing required fields: name, phone_number");
    }

    #[test]
    fn test_empty_null_and_zero_count_as_present() {
        let payload = object(json!({"name": "", "price": 0, "description": null}));
        assert!(require(&payload, &["name", "price", "description"]).is_ok());
    }

    #[test]
    fn test_ensure_not_empty() {
        assert_eq!(
            ensure_not_empty(&Map::new()),
            Err(ValidationError::EmptyPayload)
        );
        assert!(ensure_not_empty(&object(json!({"status": "shipped"}))).is_ok());
    }
}
