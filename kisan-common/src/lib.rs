//! # Kisan Common Library
//!
//! Shared code for the Kisan crop advisory backend:
//! - Database schema, pool setup and queries
//! - Credential helpers (JWT issue/verify, password digests)
//! - Configuration loading
//! - Common error type

pub mod auth;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
