//! Inference engines
//!
//! Wraps the pre-trained models behind a uniform predict contract. Model
//! parameters are loaded from JSON files once at startup and shared
//! read-only across all requests; nothing here mutates after load.

pub mod crop;
pub mod disease;

pub use crop::CropModel;
pub use disease::DiseaseModel;

use thiserror::Error;

/// A structured model output
///
/// `confidence` is on a 0-100 scale and present only for the classification
/// variant (disease detection); the crop recommender emits a bare label.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: Option<f64>,
}

/// Inference failures
///
/// A shape mismatch indicates code/model version skew, not a transient
/// fault: it is fatal for the request and never retried.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Feature vector shape mismatch: model expects {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Model has no classes")]
    EmptyModel,

    #[error("Bad pooling geometry: input_size {input_size} with grid {grid}")]
    BadGeometry { input_size: u32, grid: u32 },

    #[error("Failed to load model from {path}: {cause}")]
    LoadFailed { path: String, cause: String },
}
