//! Survey feature encoder
//!
//! Maps a survey answer set onto the numeric columns the classifier was trained
//! on. Malformed-but-well-typed answers never fail the encoder: unknown sleep
//! delay labels become code 0 and unparsable durations become 0 minutes, each
//! recorded as an `EncodingFlag`.

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::schema::SurveyInput;
use crate::types::{EncodingFlag, SleepDelay, TimeOfDay};

pub const COL_AGE: &str = "Usia";
pub const COL_SLEEP_DELAY: &str = "jeda_tidur";
pub const COL_FOMO_TOTAL: &str = "Skor_Fomo";
pub const COL_INSTAGRAM_MINUTES: &str = "Durasi_Instagram";
pub const COL_TIKTOK_MINUTES: &str = "Durasi_Tiktok";
pub const COL_WHATSAPP_MINUTES: &str = "Durasi_WhatsApp";
pub const COL_TOTAL_MINUTES: &str = "Total_Durasi";
pub const COL_LATE_NIGHT: &str = "waktu_Dini Hari (00:00 - 06:00)";
pub const COL_MORNING: &str = "waktu_Pagi (06:00 - 12:00)";
pub const COL_AFTERNOON: &str = "waktu_Siang (12:00 - 18:00)";
pub const COL_EVENING: &str = "waktu_Malam (18:00 - 00:00)";

/// Columns produced by the encoder, in encoder order
pub const FEATURE_COLUMNS: [&str; 11] = [
    COL_AGE,
    COL_SLEEP_DELAY,
    COL_FOMO_TOTAL,
    COL_INSTAGRAM_MINUTES,
    COL_TIKTOK_MINUTES,
    COL_WHATSAPP_MINUTES,
    COL_TOTAL_MINUTES,
    COL_LATE_NIGHT,
    COL_MORNING,
    COL_AFTERNOON,
    COL_EVENING,
];

/// One-hot column for a time-of-day answer
pub fn time_of_day_column(time: TimeOfDay) -> &'static str {
    match time {
        TimeOfDay::Morning => COL_MORNING,
        TimeOfDay::Afternoon => COL_AFTERNOON,
        TimeOfDay::Evening => COL_EVENING,
        TimeOfDay::LateNight => COL_LATE_NIGHT,
    }
}

/// Parse `H:MM` into total minutes, returning `None` on any malformed input
///
/// Only the shape is checked; `"25:99"` is 1599 minutes.
pub fn try_parse_duration(raw: &str) -> Option<u32> {
    let (hours, minutes) = raw.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Parse `H:MM` into total minutes, defaulting to 0
pub fn parse_duration(raw: &str) -> u32 {
    try_parse_duration(raw).unwrap_or(0)
}

/// Encoder output: the feature row plus every default that was applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedSurvey {
    pub features: FeatureVector,
    pub flags: Vec<EncodingFlag>,
}

impl EncodedSurvey {
    pub fn has_defaults(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Feature encoder for survey answers
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Encode survey answers into the canonical feature columns
    pub fn encode(survey: &SurveyInput) -> EncodedSurvey {
        let mut flags = Vec::new();

        let sleep_delay_code = match SleepDelay::from_label(&survey.sleep_delay_bucket) {
            Some(delay) => delay.code(),
            None => {
                flags.push(EncodingFlag::UnrecognizedSleepDelay {
                    label: survey.sleep_delay_bucket.clone(),
                });
                0
            }
        };

        let fomo_total: i64 = survey.fomo_scores.iter().map(|&s| i64::from(s)).sum();

        let [instagram, tiktok, whatsapp] = survey.durations().map(|(field, raw)| {
            try_parse_duration(raw).unwrap_or_else(|| {
                flags.push(EncodingFlag::UnparsableDuration {
                    field: field.to_string(),
                    raw: raw.to_string(),
                });
                0
            })
        });
        let total_minutes = u64::from(instagram) + u64::from(tiktok) + u64::from(whatsapp);

        let mut features = FeatureVector::new();
        features.push(COL_AGE, f64::from(survey.age));
        features.push(COL_SLEEP_DELAY, f64::from(sleep_delay_code));
        features.push(COL_FOMO_TOTAL, fomo_total as f64);
        features.push(COL_INSTAGRAM_MINUTES, f64::from(instagram));
        features.push(COL_TIKTOK_MINUTES, f64::from(tiktok));
        features.push(COL_WHATSAPP_MINUTES, f64::from(whatsapp));
        features.push(COL_TOTAL_MINUTES, total_minutes as f64);

        let hot = time_of_day_column(survey.time_of_day_pattern);
        for column in [COL_LATE_NIGHT, COL_MORNING, COL_AFTERNOON, COL_EVENING] {
            features.push(column, if column == hot { 1.0 } else { 0.0 });
        }

        EncodedSurvey { features, flags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_test_survey() -> SurveyInput {
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
    fn test_parse_duration() {
        assert_eq!(parse_duration("9:05"), 545);
        assert_eq!(parse_duration("25:99"), 1599);
        assert_eq!(parse_duration("0:00"), 0);
        assert_eq!(parse_duration("bad"), 0);
        assert_eq!(parse_duration("1:2:3"), 0);
        assert_eq!(parse_duration("-1:00"), 0);
        assert_eq!(parse_duration(""), 0);
    }

    #[test]
    fn test_try_parse_duration_distinguishes_zero() {
        assert_eq!(try_parse_duration("0:00"), Some(0));
        assert_eq!(try_parse_duration("bad"), None);
    }

    #[test]
    fn test_encode_reference_survey() {
        let encoded = FeatureEncoder::encode(&make_test_survey());
        let f = &encoded.features;

        assert_eq!(f.names(), &FEATURE_COLUMNS);
        assert_eq!(f.get(COL_AGE), Some(20.0));
        assert_eq!(f.get(COL_FOMO_TOTAL), Some(15.0));
        assert_eq!(f.get(COL_SLEEP_DELAY), Some(1.0));
        assert_eq!(f.get(COL_INSTAGRAM_MINUTES), Some(60.0));
        assert_eq!(f.get(COL_TIKTOK_MINUTES), Some(30.0));
        assert_eq!(f.get(COL_WHATSAPP_MINUTES), Some(0.0));
        assert_eq!(f.get(COL_TOTAL_MINUTES), Some(90.0));
        assert_eq!(f.get(COL_MORNING), Some(1.0));
        assert_eq!(f.get(COL_AFTERNOON), Some(0.0));
        assert_eq!(f.get(COL_EVENING), Some(0.0));
        assert_eq!(f.get(COL_LATE_NIGHT), Some(0.0));
        assert!(!encoded.has_defaults());
    }

    #[test]
    fn test_exactly_one_time_of_day_indicator() {
        for time in TimeOfDay::ALL {
            let mut survey = make_test_survey();
            survey.time_of_day_pattern = time;
            let encoded = FeatureEncoder::encode(&survey);

            let hot: Vec<&str> = [COL_LATE_NIGHT, COL_MORNING, COL_AFTERNOON, COL_EVENING]
                .into_iter()
                .filter(|c| encoded.features.get(c) == Some(1.0))
                .collect();
            assert_eq!(hot, vec![time_of_day_column(time)]);

            let sum: f64 = [COL_LATE_NIGHT, COL_MORNING, COL_AFTERNOON, COL_EVENING]
                .iter()
                .filter_map(|c| encoded.features.get(c))
                .sum();
            assert_eq!(sum, 1.0);
        }
    }

    #[test]
    fn test_sleep_delay_codes() {
        for delay in SleepDelay::ALL {
            let mut survey = make_test_survey();
            survey.sleep_delay_bucket = delay.label().to_string();
            let encoded = FeatureEncoder::encode(&survey);

            assert_eq!(
                encoded.features.get(COL_SLEEP_DELAY),
                Some(f64::from(delay.code()))
            );
        }
    }

    #[test]
    fn test_unrecognized_sleep_delay_defaults_to_zero() {
        let mut survey = make_test_survey();
        survey.sleep_delay_bucket = "sometime later".to_string();
        let encoded = FeatureEncoder::encode(&survey);

        assert_eq!(encoded.features.get(COL_SLEEP_DELAY), Some(0.0));
        assert_eq!(
            encoded.flags,
            vec![EncodingFlag::UnrecognizedSleepDelay {
                label: "sometime later".to_string()
            }]
        );
    }

    #[test]
    fn test_unparsable_duration_defaults_to_zero() {
        let mut survey = make_test_survey();
        survey.app_duration_2 = "half an hour".to_string();
        let encoded = FeatureEncoder::encode(&survey);

        assert_eq!(encoded.features.get(COL_TIKTOK_MINUTES), Some(0.0));
        assert_eq!(encoded.features.get(COL_TOTAL_MINUTES), Some(60.0));
        assert_eq!(
            encoded.flags,
            vec![EncodingFlag::UnparsableDuration {
                field: "app_duration_2".to_string(),
                raw: "half an hour".to_string()
            }]
        );
    }

    #[test]
    fn test_fomo_total_handles_wide_scores() {
        let mut survey = make_test_survey();
        survey.fomo_scores = vec![i32::MAX; 10];
        let encoded = FeatureEncoder::encode(&survey);

        assert_eq!(
            encoded.features.get(COL_FOMO_TOTAL),
            Some(10.0 * f64::from(i32::MAX))
        );
    }
}
