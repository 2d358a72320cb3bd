//! HTTP request handlers for the prediction endpoints

use axum::{
    extract::{Extension, Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::api::middleware::AuthFarmer;
use crate::error::{ApiError, Result};
use crate::pipeline;
use crate::state::AppContext;
use kisan_common::db::predictions::list_predictions_for_farmer;

/// Cap on stored records returned by the history endpoint
const HISTORY_LIMIT: i64 = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    recommended_crop: String,
    description: String,
}

#[derive(Debug, Serialize)]
pub struct DiseaseResponse {
    predicted_disease: String,
    description: String,
    /// Formatted as "NN.NN%"
    confidence: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    id: uuid::Uuid,
    kind: String,
    input_summary: String,
    label: String,
    confidence: Option<f64>,
    description: String,
    created_at: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    history: Vec<HistoryEntry>,
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "kisan-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Prediction Endpoints
// ============================================================================

/// POST /recommendation - Soil-based crop recommendation
///
/// Body: `{N, P, K, ph, city}`, all required. Requires an authenticated
/// caller; the outcome is recorded under their identity.
pub async fn recommendation(
    State(ctx): State<AppContext>,
    Extension(auth): Extension<AuthFarmer>,
    Json(raw): Json<Value>,
) -> Result<Json<RecommendationResponse>> {
    let farmer_id = auth.require()?;

    let outcome = pipeline::recommend(&ctx, Some(farmer_id), &raw).await?;

    info!(farmer_id = %farmer_id, crop = %outcome.crop, "Crop recommendation served");

    Ok(Json(RecommendationResponse {
        recommended_crop: outcome.crop,
        description: outcome.description,
    }))
}

/// POST /disease-detection - Leaf image disease diagnosis
///
/// Multipart body with one `file` field. Requires an authenticated caller.
pub async fn disease_detection(
    State(ctx): State<AppContext>,
    Extension(auth): Extension<AuthFarmer>,
    mut multipart: Multipart,
) -> Result<Json<DiseaseResponse>> {
    let farmer_id = auth.require()?;

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        filename = field.file_name().unwrap_or("").to_string();
        if filename.is_empty() {
            return Err(ApiError::Validation(
                crate::pipeline::normalize::ValidationError::EmptyField("file"),
            ));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to read upload: {}", e)))?;
        file_bytes = Some(bytes.to_vec());
    }

    let Some(bytes) = file_bytes else {
        return Err(ApiError::Validation(
            crate::pipeline::normalize::ValidationError::MissingField("file"),
        ));
    };

    let outcome = pipeline::diagnose(&ctx, Some(farmer_id), &filename, &bytes).await?;

    info!(
        farmer_id = %farmer_id,
        disease = %outcome.disease,
        confidence = outcome.confidence,
        "Disease diagnosis served"
    );

    Ok(Json(DiseaseResponse {
        predicted_disease: outcome.disease,
        description: outcome.description,
        confidence: format!("{:.2}%", outcome.confidence),
    }))
}

/// GET /history - Caller's prediction records, newest first
pub async fn history(
    State(ctx): State<AppContext>,
    Extension(auth): Extension<AuthFarmer>,
) -> Result<Json<HistoryResponse>> {
    let farmer_id = auth.require()?;

    let records = list_predictions_for_farmer(&ctx.db_pool, farmer_id, HISTORY_LIMIT)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let history = records
        .into_iter()
        .map(|r| HistoryEntry {
            id: r.prediction_id,
            kind: r.kind.as_str().to_string(),
            input_summary: r.input_summary,
            label: r.label,
            confidence: r.confidence,
            description: r.description,
            created_at: r.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(HistoryResponse { history }))
}
