//! Prediction pipeline
//!
//! `SleepPredictor` is the immutable handle built once from the loaded
//! artifacts. Each prediction runs:
//! 1. FeatureEncoder - survey answers to canonical feature columns
//! 2. FeatureVector::select - reorder to the scaler's fitted columns
//! 3. Preprocessor - scale the row
//! 4. Classifier - probability of poor sleep quality
//! 5. decide / advice_for - category, confidence and canned advice

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::artifacts::{load_network, load_scaler, ArtifactPaths};
use crate::encoder::{EncodedSurvey, FeatureEncoder, FEATURE_COLUMNS};
use crate::error::PredictError;
use crate::model::Classifier;
use crate::normalizer::Preprocessor;
use crate::schema::SurveyInput;
use crate::types::{AdviceMessage, PredictionResult, QualityCategory, Recommendation};

/// Probability above which the verdict is `Poor`
pub const POOR_THRESHOLD: f64 = 0.5;

/// Outcome of a single prediction
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub result: PredictionResult,
    /// Raw classifier output, probability of poor quality
    pub probability_poor: f64,
    /// Encoded row in the scaler's column order, with applied defaults
    pub encoded: EncodedSurvey,
}

/// Map the classifier probability to a category and a confidence percentage
pub fn decide(probability_poor: f64) -> (QualityCategory, f64) {
    if probability_poor > POOR_THRESHOLD {
        (QualityCategory::Poor, probability_poor * 100.0)
    } else {
        (QualityCategory::Good, (1.0 - probability_poor) * 100.0)
    }
}

pub fn format_confidence(percent: f64) -> String {
    format!("{percent:.2}")
}

/// Fixed advice for each category
pub fn advice_for(category: QualityCategory) -> AdviceMessage {
    match category {
        QualityCategory::Good => AdviceMessage {
            title: "Excellent! Keep Up Your Healthy Habits.".to_string(),
            description: "Your sleep quality is on the right track. Keep your evening screen \
                          habits balanced to stay there."
                .to_string(),
            recommendations: Vec::new(),
        },
        QualityCategory::Poor => AdviceMessage {
            title: "Time to Fix Your Sleep Pattern!".to_string(),
            description: "Your result shows a risk of disturbed sleep. A few changes to how you \
                          use your phone at night can make a difference."
                .to_string(),
            recommendations: vec![
                Recommendation {
                    title: "Digital Curfew".to_string(),
                    detail: "Try keeping a phone-free zone for at least 60 minutes before bed."
                        .to_string(),
                },
                Recommendation {
                    title: "Reset Your Timing".to_string(),
                    detail: "Heavy social media use late in the day was detected. Move your \
                             scrolling earlier."
                        .to_string(),
                },
                Recommendation {
                    title: "Cut the Dose".to_string(),
                    detail: "Your total social media time is high. Try setting a daily limit."
                        .to_string(),
                },
            ],
        },
    }
}

/// Immutable handle over the loaded preprocessor and classifier
pub struct SleepPredictor {
    preprocessor: Box<dyn Preprocessor>,
    classifier: Box<dyn Classifier>,
    instance_id: String,
    loaded_at: DateTime<Utc>,
}

impl std::fmt::Debug for SleepPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SleepPredictor")
            .field("feature_names", &self.feature_names())
            .field("input_dim", &self.classifier.input_dim())
            .field("instance_id", &self.instance_id)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

impl SleepPredictor {
    /// Build a predictor, checking the artifacts agree with the encoder and
    /// with each other
    pub fn new(
        preprocessor: impl Preprocessor + 'static,
        classifier: impl Classifier + 'static,
    ) -> Result<Self, PredictError> {
        let missing: Vec<String> = preprocessor
            .feature_names()
            .iter()
            .filter(|name| !FEATURE_COLUMNS.contains(&name.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PredictError::FeatureMismatch { missing });
        }

        let width = preprocessor.feature_names().len();
        if width != classifier.input_dim() {
            return Err(PredictError::InvalidArtifact(format!(
                "scaler produces {width} features but the network expects {}",
                classifier.input_dim()
            )));
        }

        Ok(Self {
            preprocessor: Box::new(preprocessor),
            classifier: Box::new(classifier),
            instance_id: Uuid::new_v4().to_string(),
            loaded_at: Utc::now(),
        })
    }

    /// Load both artifacts from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self, PredictError> {
        let scaler = load_scaler(&paths.scaler)?;
        let network = load_network(&paths.model)?;
        Self::new(scaler, network)
    }

    pub fn feature_names(&self) -> &[String] {
        self.preprocessor.feature_names()
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Encode a survey and order its columns for the loaded scaler
    pub fn encode(&self, survey: &SurveyInput) -> Result<EncodedSurvey, PredictError> {
        let encoded = FeatureEncoder::encode(survey);
        let features = encoded.features.select(self.feature_names())?;

        Ok(EncodedSurvey {
            features,
            flags: encoded.flags,
        })
    }

    /// Run the full pipeline for one survey
    pub fn predict(&self, survey: &SurveyInput) -> Result<Prediction, PredictError> {
        let encoded = self.encode(survey)?;
        for flag in &encoded.flags {
            warn!(?flag, "default applied while encoding survey");
        }
        debug!(features = ?encoded.features, "encoded survey");

        let scaled = self.preprocessor.transform(&encoded.features)?;
        let probability_poor = self.classifier.predict_proba(&scaled)?;

        let (category, confidence) = decide(probability_poor);
        debug!(probability_poor, category = category.as_str(), "classified survey");

        Ok(Prediction {
            result: PredictionResult {
                category,
                confidence_percent: format_confidence(confidence),
                message: advice_for(category),
            },
            probability_poor,
            encoded,
        })
    }
}

/// Validate a survey, load the artifacts and return the prediction as JSON
/// (stateless, one-shot).
///
/// # Example
/// ```ignore
/// let json = predict_sleep_quality(survey_json, &ArtifactPaths::default())?;
/// ```
pub fn predict_sleep_quality(
    survey_json: &str,
    paths: &ArtifactPaths,
) -> Result<String, PredictError> {
    let survey = SurveyInput::from_json(survey_json)?;
    survey.validate()?;

    let predictor = SleepPredictor::load(paths)?;
    let prediction = predictor.predict(&survey)?;
    Ok(serde_json::to_string_pretty(&prediction.result)?)
}
