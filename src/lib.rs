//! Sleep Quality - survey-based sleep quality prediction service
//!
//! Turns survey answers about social media habits into the feature row a
//! pre-trained classifier expects, and serves the verdict over HTTP through a
//! deterministic pipeline: survey validation → feature encoding → column
//! selection → scaling → classification → advice.
//!
//! ## Modules
//!
//! - **Encoder**: survey answers to named feature columns, with explicit flags
//!   for every lenient default
//! - **Normalizer / Model**: the fitted scaler and dense network loaded from
//!   JSON artifacts
//! - **Pipeline**: the immutable `SleepPredictor` handle and decision rule
//! - **HTTP**: axum router exposing liveness, readiness and prediction

pub mod artifacts;
pub mod config;
pub mod encoder;
pub mod error;
pub mod features;
pub mod http;
pub mod model;
pub mod normalizer;
pub mod pipeline;
pub mod schema;
pub mod types;

pub use artifacts::ArtifactPaths;
pub use config::ServiceConfig;
pub use encoder::{parse_duration, EncodedSurvey, FeatureEncoder};
pub use error::PredictError;
pub use features::FeatureVector;
pub use pipeline::{predict_sleep_quality, Prediction, SleepPredictor};

// Schema exports
pub use schema::{ErrorPayload, SurveyInput, ValidationError};

// Result types
pub use types::{AdviceMessage, PredictionResult, QualityCategory, Recommendation};

/// Service version reported by readiness and the CLI
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name used in logs and CLI reports
pub const SERVICE_NAME: &str = "sleep-quality";
