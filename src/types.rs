//! Core types for the sleep quality pipeline
//!
//! This module defines the categorical survey answers, the flags recorded by the
//! feature encoder, and the prediction result returned to clients.

use serde::{Deserialize, Serialize};

/// Time of day when social media use is heaviest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[serde(alias = "Pagi")]
    Morning,
    #[serde(alias = "Siang")]
    Afternoon,
    #[serde(alias = "Malam")]
    Evening,
    #[serde(alias = "Dini Hari")]
    LateNight,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::LateNight,
    ];
}

/// Gap between putting the phone down and falling asleep, in survey order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepDelay {
    /// Falls asleep while still scrolling
    Immediately,
    Under30Minutes,
    From30To60Minutes,
    Over60Minutes,
}

impl SleepDelay {
    pub const ALL: [SleepDelay; 4] = [
        SleepDelay::Immediately,
        SleepDelay::Under30Minutes,
        SleepDelay::From30To60Minutes,
        SleepDelay::Over60Minutes,
    ];

    /// Survey label shown to respondents
    pub fn label(&self) -> &'static str {
        match self {
            SleepDelay::Immediately => "Langsung tidur sambil membuka media sosial",
            SleepDelay::Under30Minutes => "Kurang dari 30 menit",
            SleepDelay::From30To60Minutes => "30 - 60 menit",
            SleepDelay::Over60Minutes => "lebih dari 60 menit",
        }
    }

    /// Short English key accepted in place of the survey label
    pub fn key(&self) -> &'static str {
        match self {
            SleepDelay::Immediately => "immediately",
            SleepDelay::Under30Minutes => "under_30_minutes",
            SleepDelay::From30To60Minutes => "30_to_60_minutes",
            SleepDelay::Over60Minutes => "over_60_minutes",
        }
    }

    /// Ordinal code the model was trained on
    pub fn code(&self) -> u8 {
        match self {
            SleepDelay::Immediately => 0,
            SleepDelay::Under30Minutes => 1,
            SleepDelay::From30To60Minutes => 2,
            SleepDelay::Over60Minutes => 3,
        }
    }

    /// Match a survey label or English key exactly
    pub fn from_label(label: &str) -> Option<SleepDelay> {
        SleepDelay::ALL
            .into_iter()
            .find(|delay| delay.label() == label || delay.key() == label)
    }
}

/// Lenient default applied by the feature encoder
///
/// The numeric feature still carries the default value; the flag makes the
/// substitution distinguishable from a genuine zero answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flag", rename_all = "snake_case")]
pub enum EncodingFlag {
    /// Sleep delay label was not one of the four known buckets; coded as 0
    UnrecognizedSleepDelay { label: String },
    /// Duration string was not `H:MM`; counted as 0 minutes
    UnparsableDuration { field: String, raw: String },
}

/// Binary sleep quality verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityCategory {
    Good,
    Poor,
}

impl QualityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityCategory::Good => "Good",
            QualityCategory::Poor => "Poor",
        }
    }
}

/// One piece of advice attached to a poor verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub detail: String,
}

/// Advice bundle returned with every prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceMessage {
    pub title: String,
    pub description: String,
    pub recommendations: Vec<Recommendation>,
}

/// Prediction returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "prediction")]
    pub category: QualityCategory,
    /// Confidence in the returned category, 0-100 with two decimals
    #[serde(rename = "confidence")]
    pub confidence_percent: String,
    pub message: AdviceMessage,
}
