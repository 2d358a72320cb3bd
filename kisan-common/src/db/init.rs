//! Database initialization
//!
//! Opens (creating on first run) the SQLite database and brings the schema
//! up to date. All statements are idempotent - safe to call at every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all application tables (idempotent)
///
/// Exposed separately so tests can apply the schema to an in-memory pool.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_farmers_table(pool).await?;
    create_predictions_table(pool).await?;
    Ok(())
}

async fn create_farmers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS farmers (
            farmer_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            city TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_predictions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS predictions (
            prediction_id TEXT PRIMARY KEY,
            farmer_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            input_summary TEXT NOT NULL,
            label TEXT NOT NULL,
            confidence REAL,
            description TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (farmer_id) REFERENCES farmers(farmer_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_predictions_farmer ON predictions(farmer_id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
