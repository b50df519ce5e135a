//! Error types for the sleep quality service

use thiserror::Error;

/// Errors that can occur while loading artifacts or running a prediction
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Feature columns declared by the preprocessor are missing from the encoded row: {}", missing.join(", "))]
    FeatureMismatch { missing: Vec<String> },

    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid survey: {0}")]
    InvalidInput(#[from] crate::schema::ValidationError),
}

impl PredictError {
    /// True for failures caused by the loaded artifacts rather than by a request
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            PredictError::ArtifactLoad { .. }
                | PredictError::InvalidArtifact(_)
                | PredictError::FeatureMismatch { .. }
        )
    }

    /// Message placed in the `{"error": ...}` payload returned to clients
    pub fn client_message(&self) -> String {
        match self {
            PredictError::InvalidInput(_) | PredictError::Json(_) => self.to_string(),
            _ if self.is_artifact_error() => {
                format!("Failed to load model files on the server. Detail: {self}")
            }
            _ => format!("Failed during scaling or prediction: {self}"),
        }
    }
}
