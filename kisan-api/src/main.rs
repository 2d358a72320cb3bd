//! Kisan advisory service - main entry point
//!
//! Loads the models once, opens the database, wires the provider clients
//! into an immutable application context, and serves HTTP until shutdown.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kisan_api::inference::{CropModel, DiseaseModel};
use kisan_api::services::{GeminiClient, OpenWeatherClient};
use kisan_api::state::AppContext;
use kisan_common::config::resolve_data_folder;
use kisan_common::db::init_database;

/// Command-line arguments for kisan-api
#[derive(Parser, Debug)]
#[command(name = "kisan-api")]
#[command(about = "Crop advisory backend for Kisan")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "KISAN_PORT")]
    port: u16,

    /// Data folder holding the SQLite database
    #[arg(short, long)]
    data_folder: Option<String>,

    /// Folder holding the trained model parameter files
    #[arg(short, long, default_value = "models", env = "KISAN_MODELS_FOLDER")]
    models_folder: PathBuf,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY")]
    weather_api_key: String,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY")]
    gemini_api_key: String,

    /// HS256 signing secret for bearer tokens
    #[arg(long, env = "KISAN_JWT_SECRET")]
    jwt_secret: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kisan_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting Kisan advisory service on port {}", args.port);

    let data_folder = resolve_data_folder(args.data_folder.as_deref(), "KISAN_DATA_FOLDER")
        .context("Failed to resolve data folder")?;
    info!("Data folder: {}", data_folder.display());

    let db_pool = init_database(&data_folder.join("kisan.db"))
        .await
        .context("Failed to initialize database")?;

    // Models load once and are shared read-only across all requests
    let crop_model = CropModel::load(&args.models_folder.join("crop_model.json"))
        .context("Failed to load crop model")?;
    let disease_model = DiseaseModel::load(&args.models_folder.join("disease_model.json"))
        .context("Failed to load disease model")?;
    info!("Models loaded from {}", args.models_folder.display());

    let weather = OpenWeatherClient::new(args.weather_api_key)
        .context("Failed to create weather client")?;
    let generator = GeminiClient::new(args.gemini_api_key)
        .context("Failed to create generative text client")?;

    let ctx = AppContext {
        db_pool,
        crop_model: Arc::new(crop_model),
        disease_model: Arc::new(disease_model),
        weather: Arc::new(weather),
        generator: Arc::new(generator),
        jwt_secret: Arc::new(args.jwt_secret.into_bytes()),
    };

    kisan_api::api::run(ctx, args.port)
        .await
        .context("Server error")?;

    Ok(())
}
