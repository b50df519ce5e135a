//! Feature normalization
//!
//! The classifier expects rows scaled by the preprocessor it was trained with.
//! The fitted scaler is exported to JSON and declares the feature names (and
//! their order) it was fitted on:
//!
//! ```json
//! { "kind": "standard", "feature_names_in": ["Usia", ...], "mean": [...], "scale": [...] }
//! { "kind": "min_max",  "feature_names_in": ["Usia", ...], "min": [...],  "scale": [...] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::PredictError;
use crate::features::FeatureVector;

/// Fitted transform applied to encoded rows before classification
pub trait Preprocessor: Send + Sync {
    /// Feature names in the order the transform expects them
    fn feature_names(&self) -> &[String];

    /// Transform a row whose columns are exactly `feature_names()`, in order
    fn transform(&self, row: &FeatureVector) -> Result<Vec<f64>, PredictError>;
}

/// Scaler exported from a fitted scikit-learn transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `StandardScaler`: `(x - mean) / scale`
    Standard {
        feature_names_in: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// `MinMaxScaler`: `x * scale + min`
    MinMax {
        feature_names_in: Vec<String>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl Scaler {
    /// Parse and validate a scaler artifact
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        let scaler: Scaler = serde_json::from_str(json)?;
        scaler.check()?;
        Ok(scaler)
    }

    fn parameters(&self) -> (&[f64], &[f64]) {
        match self {
            Scaler::Standard { mean, scale, .. } => (mean, scale),
            Scaler::MinMax { min, scale, .. } => (min, scale),
        }
    }

    fn check(&self) -> Result<(), PredictError> {
        let names = self.feature_names();
        if names.is_empty() {
            return Err(PredictError::InvalidArtifact(
                "scaler declares no features".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(PredictError::InvalidArtifact(format!(
                "scaler declares feature {dup:?} twice"
            )));
        }

        let (offset, scale) = self.parameters();
        if offset.len() != names.len() || scale.len() != names.len() {
            return Err(PredictError::InvalidArtifact(format!(
                "scaler has {} features but {} offsets and {} scales",
                names.len(),
                offset.len(),
                scale.len()
            )));
        }

        if offset.iter().chain(scale).any(|v| !v.is_finite()) {
            return Err(PredictError::InvalidArtifact(
                "scaler parameters must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

impl Preprocessor for Scaler {
    fn feature_names(&self) -> &[String] {
        match self {
            Scaler::Standard {
                feature_names_in, ..
            }
            | Scaler::MinMax {
                feature_names_in, ..
            } => feature_names_in,
        }
    }

    fn transform(&self, row: &FeatureVector) -> Result<Vec<f64>, PredictError> {
        if row.names() != self.feature_names() {
            return Err(PredictError::Transform(format!(
                "row columns [{}] do not match fitted columns [{}]",
                row.names().join(", "),
                self.feature_names().join(", ")
            )));
        }

        if let Some((name, value)) = row.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PredictError::Transform(format!(
                "feature {name:?} is not finite ({value})"
            )));
        }

        let (offset, scale) = self.parameters();
        if offset.len() != row.len() || scale.len() != row.len() {
            return Err(PredictError::Transform(format!(
                "scaler has {} features but {} offsets and {} scales",
                row.len(),
                offset.len(),
                scale.len()
            )));
        }

        let values = row.values();
        let scaled = match self {
            Scaler::Standard { mean, scale, .. } => values
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / non_zero_scale(*s))
                .collect(),
            Scaler::MinMax { min, scale, .. } => values
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (lo, s))| x * s + lo)
                .collect(),
        };
        Ok(scaled)
    }
}

/// Constant features are fitted with a zero scale; they pass through unscaled
fn non_zero_scale(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}
