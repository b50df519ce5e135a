//! HTTP handlers for the REST API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};
use uuid::Uuid;

use super::dto::{HealthResponse, ReadinessResponse, WelcomeResponse};
use super::error::AppError;
use super::state::AppState;
use crate::schema::{ErrorPayload, SurveyInput};
use crate::SERVICE_VERSION;

// =============================================================================
// Service status
// =============================================================================

/// GET /
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome! API is running. POST survey answers to /api/predict.".to_string(),
    })
}

/// GET /api/health
///
/// Liveness only; does not look at the model artifacts.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /api/ready
///
/// 200 once the artifacts are loaded, 503 with the load error otherwise.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    match state.predictor() {
        Ok(predictor) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                model_loaded: true,
                version: SERVICE_VERSION.to_string(),
                instance_id: Some(predictor.instance_id().to_string()),
                loaded_at: Some(predictor.loaded_at()),
                detail: None,
            }),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "unavailable".to_string(),
                model_loaded: false,
                version: SERVICE_VERSION.to_string(),
                instance_id: None,
                loaded_at: None,
                detail: Some(err.to_string()),
            }),
        ),
    }
}

// =============================================================================
// Prediction
// =============================================================================

/// POST /api/predict
///
/// Returns the prediction, or `{"error": ...}` with status 200 when the
/// artifacts, the scaler or the network fail.
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<SurveyInput>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(survey) = payload?;

    let violations = survey.validation_errors();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let predictor = match state.predictor() {
        Ok(predictor) => predictor,
        Err(err) => {
            error!("Prediction requested but artifacts are unavailable: {err}");
            return Ok(Json(ErrorPayload::from(err)).into_response());
        }
    };

    match predictor.predict(&survey) {
        Ok(prediction) => {
            info!(
                category = prediction.result.category.as_str(),
                confidence = %prediction.result.confidence_percent,
                defaults_applied = prediction.encoded.flags.len(),
                "Prediction served"
            );
            Ok(Json(prediction.result).into_response())
        }
        Err(err) => {
            error!("Prediction failed: {err}");
            Ok(Json(ErrorPayload::from(&err)).into_response())
        }
    }
}
