//! Error types for kisan-api
//!
//! One enum covers the whole request path. The `IntoResponse` impl is the
//! single place where pipeline failures are mapped to HTTP statuses:
//! client-side problems get a message naming the cause, server-side
//! problems get a generic body with the root cause logged only.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::inference::InferenceError;
use crate::pipeline::normalize::ValidationError;
use crate::services::WeatherError;

/// Generic body for 500-class responses; internal detail stays in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred.";

/// Main error type for kisan-api request handling
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing client input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Client mistake that is not a field-shape problem (e.g. duplicate email)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing, expired, or invalid credential
    #[error("Auth error: {0}")]
    Auth(String),

    /// Unknown owner or location
    #[error("Not found: {0}")]
    NotFound(String),

    /// Weather provider failure
    #[error("Enrichment error: {0}")]
    Enrichment(WeatherError),

    /// Model failure (shape mismatch, empty model)
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// Anything else server-side
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        match e {
            // An unresolvable location is the caller's problem, not an outage
            WeatherError::CityNotFound(city) => {
                ApiError::NotFound(format!("City not found: {}", city))
            }
            other => ApiError::Enrichment(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            // Decode failures surface as internal errors; the upload reached
            // the server fine, the pipeline could not process it.
            ApiError::Validation(ValidationError::BadImage(cause)) => {
                tracing::error!("Image decode failed: {}", cause);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
            ApiError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Enrichment(e) => {
                tracing::error!("Weather provider failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
            ApiError::Inference(e) => {
                tracing::error!("Inference failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Convenience Result type for handlers and the pipeline
pub type Result<T> = std::result::Result<T, ApiError>;
