//! External service clients
//!
//! One client per provider. The pipeline depends on the traits here, not on
//! the concrete clients, so tests can substitute recording mocks.

pub mod gemini_client;
pub mod openweather_client;

pub use gemini_client::GeminiClient;
pub use openweather_client::OpenWeatherClient;

use async_trait::async_trait;
use thiserror::Error;

/// Live weather metrics for a location, fetched fresh per request
///
/// Never cached and never persisted on its own; only embedded into the
/// feature vector for the recommendation variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub rainfall_mm: f64,
}

/// Weather provider errors
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather provider unavailable: {0}")]
    Unavailable(String),
}

/// Generative-text provider errors
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Text provider unavailable: {0}")]
    Unavailable(String),

    #[error("Text provider returned an empty response")]
    EmptyResponse,
}

/// Resolves a location string to live weather metrics
///
/// A failed lookup fails the whole request; implementations must not
/// substitute defaults or stale data.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;
}

/// Produces free text from a prompt
///
/// Callers treat any failure as best-effort: a single attempt, then a
/// fallback string.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
