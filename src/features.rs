//! Named feature rows
//!
//! A `FeatureVector` is a single row of named numeric columns. The encoder
//! produces columns in its own canonical order; `select` reorders them to the
//! sequence declared by the fitted preprocessor.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::PredictError;

/// Ordered row of named numeric features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFeatureVector")]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

/// Wire form of `FeatureVector`, checked before it becomes one
#[derive(Deserialize)]
struct RawFeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

impl TryFrom<RawFeatureVector> for FeatureVector {
    type Error = String;

    fn try_from(raw: RawFeatureVector) -> Result<Self, Self::Error> {
        if raw.names.len() != raw.values.len() {
            return Err(format!(
                "feature row has {} names but {} values",
                raw.names.len(),
                raw.values.len()
            ));
        }

        let mut row = FeatureVector::new();
        for (name, value) in raw.names.into_iter().zip(raw.values) {
            row.push(name, value);
        }
        Ok(row)
    }
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, replacing the value if the name is already present
    pub fn push(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.names.iter().position(|n| *n == name) {
            Some(idx) => self.values[idx] = value,
            None => {
                self.names.push(name);
                self.values.push(value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values[idx])
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Select and reorder columns to exactly `names`
    ///
    /// Columns not listed are dropped. Any listed name without a column is a
    /// configuration mismatch between the encoder and the loaded artifact.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<FeatureVector, PredictError> {
        let index: HashMap<&str, f64> = self.iter().collect();

        let missing: Vec<String> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !index.contains_key(name))
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(PredictError::FeatureMismatch { missing });
        }

        let mut selected = FeatureVector::new();
        for name in names {
            let name = name.as_ref();
            selected.push(name, index[name]);
        }
        Ok(selected)
    }
}
