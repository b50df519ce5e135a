//! Error payload returned in place of a prediction

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// `{"error": "..."}` body sent with HTTP 200 when artifacts, scaling or
/// inference fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl From<&PredictError> for ErrorPayload {
    fn from(err: &PredictError) -> Self {
        Self {
            error: err.client_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_shape() {
        let err = PredictError::Transform("row has 3 columns, expected 11".to_string());
        let payload = ErrorPayload::from(&err);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "error": "Failed during scaling or prediction: Transform error: row has 3 columns, expected 11"
            })
        );
    }
}
