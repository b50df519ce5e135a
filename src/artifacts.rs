//! Artifact loading
//!
//! The fitted scaler and the trained network are read from JSON files once,
//! when the predictor is built.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PredictError;
use crate::model::DenseNetwork;
use crate::normalizer::Scaler;

/// Default scaler artifact location, relative to the working directory
pub const DEFAULT_SCALER_PATH: &str = "artifacts/sleep_scaler.json";

/// Default network artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "artifacts/sleep_model.json";

/// Locations of the two model artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            scaler: PathBuf::from(DEFAULT_SCALER_PATH),
            model: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

impl ArtifactPaths {
    pub fn new(scaler: impl Into<PathBuf>, model: impl Into<PathBuf>) -> Self {
        Self {
            scaler: scaler.into(),
            model: model.into(),
        }
    }
}

/// Load the fitted scaler artifact
pub fn load_scaler(path: &Path) -> Result<Scaler, PredictError> {
    let json = read_artifact(path)?;
    Scaler::from_json(&json).map_err(|e| with_path(e, path))
}

/// Load the trained network artifact
pub fn load_network(path: &Path) -> Result<DenseNetwork, PredictError> {
    let json = read_artifact(path)?;
    DenseNetwork::from_json(&json).map_err(|e| with_path(e, path))
}

fn read_artifact(path: &Path) -> Result<String, PredictError> {
    fs::read_to_string(path).map_err(|e| PredictError::ArtifactLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Attach the file path to syntax errors so they read as load failures
fn with_path(err: PredictError, path: &Path) -> PredictError {
    match err {
        PredictError::Json(e) => PredictError::ArtifactLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        },
        PredictError::InvalidArtifact(reason) => {
            PredictError::InvalidArtifact(format!("{}: {reason}", path.display()))
        }
        other => other,
    }
}
