//! Kisan advisory service
//!
//! Backend-for-frontend serving crop recommendations and leaf disease
//! diagnoses. One linear pipeline per request composes input
//! normalization, weather enrichment, model inference, narrative
//! generation and best-effort record keeping.

pub mod api;
pub mod error;
pub mod inference;
pub mod pipeline;
pub mod services;
pub mod state;
