//! Leaf disease classification model
//!
//! Linear softmax classifier over pooled pixel features. The upload is
//! decoded, resized to `input_size` x `input_size` RGB with pixels scaled to
//! [0,1], then mean-pooled into a `grid` x `grid` cell layout per channel;
//! the flattened cells are the feature vector (`grid * grid * 3` values).
//! Parameters are exported at training time as JSON.

use serde::Deserialize;
use std::path::Path;

use super::{InferenceError, Prediction};

/// Serialized model parameters
#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseModelParams {
    /// Side length the input image is resized to
    pub input_size: u32,
    /// Pooled cells per image side; features = grid * grid * 3
    pub grid: u32,
    /// Raw class labels as trained (underscore-separated dataset names)
    pub labels: Vec<String>,
    /// One weight row per class, each `grid * grid * 3` long
    pub weights: Vec<Vec<f64>>,
    /// One bias per class
    pub biases: Vec<f64>,
}

/// Disease classification model, immutable after load
#[derive(Debug)]
pub struct DiseaseModel {
    params: DiseaseModelParams,
}

impl DiseaseModel {
    /// Load model parameters from a JSON file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let text = std::fs::read_to_string(path).map_err(|e| InferenceError::LoadFailed {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        let params: DiseaseModelParams =
            serde_json::from_str(&text).map_err(|e| InferenceError::LoadFailed {
                path: path.display().to_string(),
                cause: e.to_string(),
            })?;
        Self::from_params(params)
    }

    /// Build a model from already-parsed parameters (used by tests)
    pub fn from_params(params: DiseaseModelParams) -> Result<Self, InferenceError> {
        if params.labels.is_empty() {
            return Err(InferenceError::EmptyModel);
        }
        // The normalizer pools input_size / grid cells per side; the grid
        // must tile the input exactly.
        if params.grid == 0 || params.input_size % params.grid != 0 {
            return Err(InferenceError::BadGeometry {
                input_size: params.input_size,
                grid: params.grid,
            });
        }
        let expected = params.feature_len();
        if params.weights.len() != params.labels.len() || params.biases.len() != params.labels.len()
        {
            return Err(InferenceError::ShapeMismatch {
                expected: params.labels.len(),
                actual: params.weights.len().min(params.biases.len()),
            });
        }
        for row in &params.weights {
            if row.len() != expected {
                return Err(InferenceError::ShapeMismatch {
                    expected,
                    actual: row.len(),
                });
            }
        }
        Ok(Self { params })
    }

    /// Side length the normalizer must resize uploads to
    pub fn input_size(&self) -> u32 {
        self.params.input_size
    }

    /// Pooled cells per image side
    pub fn grid(&self) -> u32 {
        self.params.grid
    }

    /// Expected feature vector length
    pub fn input_len(&self) -> usize {
        self.params.feature_len()
    }

    /// Classify a pooled-pixel feature vector
    ///
    /// Returns the argmax label (raw, underscore form) with its softmax
    /// probability on a 0-100 scale.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, InferenceError> {
        let expected = self.input_len();
        if features.len() != expected {
            return Err(InferenceError::ShapeMismatch {
                expected,
                actual: features.len(),
            });
        }

        let logits: Vec<f64> = self
            .params
            .weights
            .iter()
            .zip(self.params.biases.iter())
            .map(|(row, bias)| {
                row.iter().zip(features.iter()).map(|(w, x)| w * x).sum::<f64>() + bias
            })
            .collect();

        // Softmax with max subtraction for numeric stability
        let max_logit = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max_logit).exp()).collect();
        let sum: f64 = exps.iter().sum();

        let (best_idx, best_exp) = exps
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .ok_or(InferenceError::EmptyModel)?;

        Ok(Prediction {
            label: self.params.labels[best_idx].clone(),
            confidence: Some(best_exp / sum * 100.0),
        })
    }
}

impl DiseaseModelParams {
    fn feature_len(&self) -> usize {
        (self.grid * self.grid * 3) as usize
    }
}

/// Normalize a raw dataset label for display
///
/// Dataset labels look like `Tomato___Late_blight`; the caller-facing form
/// is `Tomato - Late blight`.
pub fn display_label(raw: &str) -> String {
    raw.replace("___", " - ").replace('_', " ")
}
