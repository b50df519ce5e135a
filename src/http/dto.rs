//! Response bodies for the non-prediction endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response for `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// "ready" or "unavailable"
    pub status: String,
    pub model_loaded: bool,
    /// Service version
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    /// Why the artifacts could not be loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
