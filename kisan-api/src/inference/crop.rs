//! Crop recommendation model
//!
//! Nearest-centroid recommender over seven soil/weather features. Parameters
//! come from a JSON file exported at training time: per-class centroids plus
//! the min/max ranges used to scale features into [0,1] before the distance
//! computation. The trained feature order is fixed:
//! `[N, P, K, temperature, humidity, ph, rainfall]`.

use serde::Deserialize;
use std::path::Path;

use super::{InferenceError, Prediction};

/// One crop class with its feature-space centroid
#[derive(Debug, Clone, Deserialize)]
pub struct CropClass {
    pub label: String,
    pub centroid: Vec<f64>,
}

/// Serialized model parameters
#[derive(Debug, Clone, Deserialize)]
pub struct CropModelParams {
    pub feature_names: Vec<String>,
    /// Per-feature minimum of the training data (scaling)
    pub scale_min: Vec<f64>,
    /// Per-feature maximum of the training data (scaling)
    pub scale_max: Vec<f64>,
    pub classes: Vec<CropClass>,
}

/// Crop recommendation model, immutable after load
#[derive(Debug)]
pub struct CropModel {
    params: CropModelParams,
}

impl CropModel {
    /// Load model parameters from a JSON file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let text = std::fs::read_to_string(path).map_err(|e| InferenceError::LoadFailed {
            path: path.display().to_string(),
            cause: e.to_string(),
        })?;
        let params: CropModelParams =
            serde_json::from_str(&text).map_err(|e| InferenceError::LoadFailed {
                path: path.display().to_string(),
                cause: e.to_string(),
            })?;
        Self::from_params(params)
    }

    /// Build a model from already-parsed parameters (used by tests)
    pub fn from_params(params: CropModelParams) -> Result<Self, InferenceError> {
        if params.classes.is_empty() {
            return Err(InferenceError::EmptyModel);
        }
        let n = params.feature_names.len();
        if params.scale_min.len() != n || params.scale_max.len() != n {
            return Err(InferenceError::ShapeMismatch {
                expected: n,
                actual: params.scale_min.len().min(params.scale_max.len()),
            });
        }
        for class in &params.classes {
            if class.centroid.len() != n {
                return Err(InferenceError::ShapeMismatch {
                    expected: n,
                    actual: class.centroid.len(),
                });
            }
        }
        Ok(Self { params })
    }

    /// Number of features the model was trained on
    pub fn input_len(&self) -> usize {
        self.params.feature_names.len()
    }

    /// Predict the recommended crop for a feature vector
    ///
    /// No confidence score: the recommender reports a single label.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, InferenceError> {
        let n = self.input_len();
        if features.len() != n {
            return Err(InferenceError::ShapeMismatch {
                expected: n,
                actual: features.len(),
            });
        }

        let scaled = self.scale(features);

        let mut best: Option<(&CropClass, f64)> = None;
        for class in &self.params.classes {
            let centroid_scaled = self.scale(&class.centroid);
            let dist: f64 = scaled
                .iter()
                .zip(centroid_scaled.iter())
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            match best {
                Some((_, d)) if d <= dist => {}
                _ => best = Some((class, dist)),
            }
        }

        // classes is non-empty, checked at load
        let (class, _) = best.ok_or(InferenceError::EmptyModel)?;
        Ok(Prediction {
            label: class.label.clone(),
            confidence: None,
        })
    }

    /// Min-max scale a raw feature vector into [0,1] per feature
    fn scale(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let lo = self.params.scale_min[i];
                let hi = self.params.scale_max[i];
                if hi > lo {
                    ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    }
}
