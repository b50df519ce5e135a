//! Sleep quality classifier
//!
//! The trained network is a stack of dense layers exported to JSON with Keras
//! kernel layout (`kernel[input][unit]`). The final layer has a single unit
//! whose output is the probability of poor sleep quality.

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Binary classifier over a normalized feature row
pub trait Classifier: Send + Sync {
    /// Number of inputs the classifier expects
    fn input_dim(&self) -> usize;

    /// Probability of the positive (poor quality) class
    fn predict_proba(&self, input: &[f64]) -> Result<f64, PredictError>;
}

/// Layer activation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => x.tanh(),
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Fully connected layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub activation: Activation,
    /// Weights indexed `[input][unit]`
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

impl DenseLayer {
    pub fn inputs(&self) -> usize {
        self.kernel.len()
    }

    pub fn units(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out = self.bias.clone();
        for (x, weights) in input.iter().zip(&self.kernel) {
            for (acc, w) in out.iter_mut().zip(weights) {
                *acc += x * w;
            }
        }
        out.into_iter().map(|z| self.activation.apply(z)).collect()
    }
}

/// Feed-forward network of dense layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseNetwork {
    pub input_dim: usize,
    pub layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Parse and validate a network artifact
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        let network: DenseNetwork = serde_json::from_str(json)?;
        network.check()?;
        Ok(network)
    }

    /// Build a network from layers, validating shapes
    pub fn new(input_dim: usize, layers: Vec<DenseLayer>) -> Result<Self, PredictError> {
        let network = Self { input_dim, layers };
        network.check()?;
        Ok(network)
    }

    fn check(&self) -> Result<(), PredictError> {
        if self.input_dim == 0 {
            return Err(PredictError::InvalidArtifact(
                "network input_dim must be positive".to_string(),
            ));
        }

        let Some(last) = self.layers.last() else {
            return Err(PredictError::InvalidArtifact(
                "network has no layers".to_string(),
            ));
        };

        let mut width = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.inputs() != width {
                return Err(PredictError::InvalidArtifact(format!(
                    "layer {idx} expects {} inputs but receives {width}",
                    layer.inputs()
                )));
            }
            if layer.units() == 0 {
                return Err(PredictError::InvalidArtifact(format!(
                    "layer {idx} has no units"
                )));
            }
            if let Some(row) = layer.kernel.iter().position(|r| r.len() != layer.units()) {
                return Err(PredictError::InvalidArtifact(format!(
                    "layer {idx} kernel row {row} does not have {} units",
                    layer.units()
                )));
            }
            let finite = layer
                .kernel
                .iter()
                .flatten()
                .chain(&layer.bias)
                .all(|w| w.is_finite());
            if !finite {
                return Err(PredictError::InvalidArtifact(format!(
                    "layer {idx} has non-finite weights"
                )));
            }
            width = layer.units();
        }

        if last.units() != 1 {
            return Err(PredictError::InvalidArtifact(format!(
                "output layer must have exactly one unit, found {}",
                last.units()
            )));
        }

        Ok(())
    }
}

impl Classifier for DenseNetwork {
    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict_proba(&self, input: &[f64]) -> Result<f64, PredictError> {
        if input.len() != self.input_dim {
            return Err(PredictError::Inference(format!(
                "expected {} inputs, got {}",
                self.input_dim,
                input.len()
            )));
        }

        let output = self
            .layers
            .iter()
            .fold(input.to_vec(), |activations, layer| layer.forward(&activations));

        match output.first() {
            Some(&p) if p.is_finite() && (0.0..=1.0).contains(&p) => Ok(p),
            Some(&p) => Err(PredictError::Inference(format!(
                "network output {p} is not a probability"
            ))),
            None => Err(PredictError::Inference(
                "network produced no output".to_string(),
            )),
        }
    }
}
