//! Shared application context
//!
//! Built once at startup and cloned into every handler. Models are loaded
//! once and shared read-only; the external providers sit behind trait
//! objects so tests can substitute mocks.

use sqlx::{Pool, Sqlite};
use std::sync::Arc;

use crate::inference::{CropModel, DiseaseModel};
use crate::services::{TextGenerator, WeatherProvider};

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub db_pool: Pool<Sqlite>,
    pub crop_model: Arc<CropModel>,
    pub disease_model: Arc<DiseaseModel>,
    pub weather: Arc<dyn WeatherProvider>,
    pub generator: Arc<dyn TextGenerator>,
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: Arc<Vec<u8>>,
}
