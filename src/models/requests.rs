//! Request DTOs for the cluster API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cluster::{MAX_KEY_LENGTH, MAX_VALUE_SIZE};

/// Request body for the SET operation (POST /set/:key)
///
/// The key travels in the path; only the value is in the body.
#[derive(Debug, Clone, Deserialize)]
pub struct SetValueRequest {
    /// The value to store
    pub value: String,
}

impl SetValueRequest {
    /// Validates the request against the key it will be stored under
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        if self.value.len() > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserialize() {
        let json = r#"{"value": "hello"}"#;
        let req: SetValueRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.value, "hello");
    }

    #[test]
    fn test_set_request_missing_value() {
        let json = r#"{"key": "test"}"#;
        assert!(serde_json::from_str::<SetValueRequest>(json).is_err());
    }

    #[test]
    fn test_validate_empty_key() {
        let req = SetValueRequest {
            value: "test".to_string(),
        };
        assert!(req.validate("").is_some());
    }

    #[test]
    fn test_validate_oversized_value() {
        let req = SetValueRequest {
            value: "x".repeat(MAX_VALUE_SIZE + 1),
        };
        assert!(req.validate("key").is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SetValueRequest {
            value: "test".to_string(),
        };
        assert!(req.validate("valid_key").is_none());
    }
}
