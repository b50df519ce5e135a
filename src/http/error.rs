//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::schema::ValidationError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Request errors rejected before the prediction pipeline runs.
#[derive(Debug)]
pub enum AppError {
    /// Body is not JSON, lacks a field, or has a wrongly typed field
    InvalidBody(JsonRejection),
    /// Body parsed but violates the survey constraints
    Validation(Vec<ValidationError>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            // Syntax, missing-field and type errors share the validation status
            AppError::InvalidBody(rejection) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("VALIDATION_ERROR", rejection.body_text()),
            ),
            AppError::Validation(errors) => {
                let message = errors
                    .first()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "invalid survey".to_string());
                let mut error = ApiError::new("VALIDATION_ERROR", message);
                if errors.len() > 1 {
                    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
                    error = error.with_details(details.join("; "));
                }
                (StatusCode::UNPROCESSABLE_ENTITY, error)
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection)
    }
}
