//! Survey request schema
//!
//! Field names are English; the names used by the Indonesian survey form are
//! accepted as aliases so existing clients keep working.

use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::types::TimeOfDay;

/// Youngest respondent the model was trained on
pub const MIN_AGE: u32 = 13;

/// Oldest respondent the model was trained on
pub const MAX_AGE: u32 = 27;

/// Number of items on the FOMO self-report scale
pub const FOMO_ITEMS: usize = 10;

/// Survey answers submitted for a prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyInput {
    #[serde(alias = "usia")]
    pub age: u32,
    #[serde(alias = "pola_waktu")]
    pub time_of_day_pattern: TimeOfDay,
    /// Survey label for the screen-to-sleep gap
    #[serde(alias = "jeda_tidur")]
    pub sleep_delay_bucket: String,
    pub fomo_scores: Vec<i32>,
    /// Instagram usage, `H:MM`
    #[serde(alias = "durasi_app1")]
    pub app_duration_1: String,
    /// TikTok usage, `H:MM`
    #[serde(alias = "durasi_app2")]
    pub app_duration_2: String,
    /// WhatsApp usage, `H:MM`
    #[serde(alias = "durasi_app3")]
    pub app_duration_3: String,
}

impl SurveyInput {
    /// Parse a survey from JSON without validating it
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the request shape the model depends on
    ///
    /// Sleep delay labels are not checked here; the encoder maps unknown labels
    /// to code 0 and flags them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.validation_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Every shape violation in field order
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            errors.push(ValidationError::AgeOutOfRange { age: self.age });
        }

        if self.fomo_scores.len() != FOMO_ITEMS {
            errors.push(ValidationError::FomoItemCount {
                expected: FOMO_ITEMS,
                actual: self.fomo_scores.len(),
            });
        }

        for (field, value) in self.durations() {
            if !is_duration_pattern(value) {
                errors.push(ValidationError::InvalidDuration {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }

        errors
    }

    /// The three app duration fields paired with their wire names
    pub fn durations(&self) -> [(&'static str, &str); 3] {
        [
            ("app_duration_1", self.app_duration_1.as_str()),
            ("app_duration_2", self.app_duration_2.as_str()),
            ("app_duration_3", self.app_duration_3.as_str()),
        ]
    }
}

/// `H:MM` or `HH:MM`: one or two digits, a colon, exactly two digits
pub fn is_duration_pattern(value: &str) -> bool {
    let Some((hours, minutes)) = value.split_once(':') else {
        return false;
    };

    (1..=2).contains(&hours.len())
        && minutes.len() == 2
        && hours.bytes().all(|b| b.is_ascii_digit())
        && minutes.bytes().all(|b| b.is_ascii_digit())
}

/// Shape errors rejected before the request reaches the encoder
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("age must be between {} and {}, got {age}", MIN_AGE, MAX_AGE)]
    AgeOutOfRange { age: u32 },

    #[error("fomo_scores must contain exactly {expected} items, got {actual}")]
    FomoItemCount { expected: usize, actual: usize },

    #[error("{field} must match H:MM or HH:MM, got {value:?}")]
    InvalidDuration { field: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_survey() -> SurveyInput {
        SurveyInput {
            age: 20,
            time_of_day_pattern: TimeOfDay::Morning,
            sleep_delay_bucket: "Kurang dari 30 menit".to_string(),
            fomo_scores: vec![1, 2, 1, 2, 1, 2, 1, 2, 1, 2],
            app_duration_1: "1:00".to_string(),
            app_duration_2: "0:30".to_string(),
            app_duration_3: "0:00".to_string(),
        }
    }

    #[test]
    fn test_valid_survey_passes() {
        assert_eq!(valid_survey().validate(), Ok(()));
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        let mut survey = valid_survey();
        survey.age = 13;
        assert!(survey.validate().is_ok());
        survey.age = 27;
        assert!(survey.validate().is_ok());
        survey.age = 28;
        assert_eq!(
            survey.validate(),
            Err(ValidationError::AgeOutOfRange { age: 28 })
        );
        survey.age = 12;
        assert!(survey.validate().is_err());
    }

    #[test]
    fn test_age_message_names_bounds() {
        let err = ValidationError::AgeOutOfRange { age: 30 };
        assert_eq!(
            err.to_string(),
            format!("age must be between {MIN_AGE} and {MAX_AGE}, got 30")
        );
    }

    #[test]
    fn test_fomo_scores_need_ten_items() {
        let mut survey = valid_survey();
        survey.fomo_scores.pop();

        assert_eq!(
            survey.validate(),
            Err(ValidationError::FomoItemCount {
                expected: 10,
                actual: 9
            })
        );
    }

    #[test]
    fn test_collects_all_errors_in_field_order() {
        let mut survey = valid_survey();
        survey.age = 40;
        survey.app_duration_3 = "90".to_string();

        let errors = survey.validation_errors();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::AgeOutOfRange { .. }));
        assert_eq!(
            errors[1],
            ValidationError::InvalidDuration {
                field: "app_duration_3".to_string(),
                value: "90".to_string()
            }
        );
    }

    #[test]
    fn test_duration_pattern() {
        assert!(is_duration_pattern("9:05"));
        assert!(is_duration_pattern("12:30"));
        assert!(is_duration_pattern("25:99"));
        assert!(!is_duration_pattern("123:00"));
        assert!(!is_duration_pattern("1:5"));
        assert!(!is_duration_pattern(":30"));
        assert!(!is_duration_pattern("1:00:00"));
        assert!(!is_duration_pattern("a:bc"));
    }

    #[test]
    fn test_parses_survey_form_field_names() {
        let json = r#"{
            "usia": 19,
            "pola_waktu": "Malam",
            "jeda_tidur": "30 - 60 menit",
            "fomo_scores": [3, 3, 3, 3, 3, 3, 3, 3, 3, 3],
            "durasi_app1": "2:15",
            "durasi_app2": "1:00",
            "durasi_app3": "0:45"
        }"#;

        let survey = SurveyInput::from_json(json).unwrap();
        assert_eq!(survey.age, 19);
        assert_eq!(survey.time_of_day_pattern, TimeOfDay::Evening);
        assert_eq!(survey.app_duration_1, "2:15");
    }

    #[test]
    fn test_rejects_unknown_time_of_day() {
        let json = r#"{
            "age": 19,
            "time_of_day_pattern": "Noon",
            "sleep_delay_bucket": "30 - 60 menit",
            "fomo_scores": [3, 3, 3, 3, 3, 3, 3, 3, 3, 3],
            "app_duration_1": "2:15",
            "app_duration_2": "1:00",
            "app_duration_3": "0:45"
        }"#;

        assert!(matches!(
            SurveyInput::from_json(json),
            Err(PredictError::Json(_))
        ));
    }
}
