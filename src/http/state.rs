//! Application state for the HTTP server.

use std::sync::Arc;
use tracing::{error, info};

use crate::artifacts::ArtifactPaths;
use crate::error::PredictError;
use crate::pipeline::SleepPredictor;

/// Outcome of loading the model artifacts at startup
#[derive(Debug, Clone)]
pub enum ModelState {
    Ready(Arc<SleepPredictor>),
    /// Artifacts failed to load; predictions answer with the load error
    Unavailable(Arc<PredictError>),
}

/// Shared application state passed to all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub model: ModelState,
}

impl AppState {
    /// State serving predictions from a loaded predictor
    pub fn ready(predictor: SleepPredictor) -> Self {
        Self {
            model: ModelState::Ready(Arc::new(predictor)),
        }
    }

    /// State reporting a load failure on every prediction
    pub fn unavailable(err: PredictError) -> Self {
        Self {
            model: ModelState::Unavailable(Arc::new(err)),
        }
    }

    /// Load the artifacts once; a failure keeps the server up but not ready
    pub fn load(paths: &ArtifactPaths) -> Self {
        match SleepPredictor::load(paths) {
            Ok(predictor) => {
                info!(
                    scaler = %paths.scaler.display(),
                    model = %paths.model.display(),
                    features = predictor.feature_names().len(),
                    instance_id = predictor.instance_id(),
                    "Model artifacts loaded"
                );
                Self::ready(predictor)
            }
            Err(e) => {
                error!("Failed to load model artifacts: {e}");
                Self::unavailable(e)
            }
        }
    }

    pub fn predictor(&self) -> Result<&SleepPredictor, &PredictError> {
        match &self.model {
            ModelState::Ready(predictor) => Ok(predictor.as_ref()),
            ModelState::Unavailable(err) => Err(err.as_ref()),
        }
    }
}
