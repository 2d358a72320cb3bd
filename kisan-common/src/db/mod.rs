//! Database access layer
//!
//! Provides pool initialization, schema creation, and queries for
//! farmers and prediction records.

pub mod farmers;
pub mod init;
pub mod predictions;

pub use init::init_database;
