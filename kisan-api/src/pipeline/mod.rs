//! Prediction pipeline
//!
//! One linear flow per request: normalize the input, enrich with weather
//! (recommendation variant only), run inference, generate a narrative, and
//! record the outcome. Validation rejects before any external call; the
//! narrative and record stages are best-effort and never fail the request.

pub mod narrative;
pub mod normalize;
pub mod record;

use serde_json::Value;
use uuid::Uuid;

use crate::error::Result;
use crate::inference::disease::display_label;
use crate::state::AppContext;
use kisan_common::db::predictions::PredictionKind;

/// Final result of the recommendation pipeline
#[derive(Debug, Clone)]
pub struct RecommendationOutcome {
    pub crop: String,
    pub description: String,
}

/// Final result of the disease detection pipeline
#[derive(Debug, Clone)]
pub struct DiagnosisOutcome {
    pub disease: String,
    pub description: String,
    /// 0-100 scale; formatted at the HTTP boundary
    pub confidence: f64,
}

/// Soil-based crop recommendation
///
/// Normalize -> enrich (weather) -> infer -> narrate -> record.
pub async fn recommend(
    ctx: &AppContext,
    farmer_id: Option<Uuid>,
    raw: &Value,
) -> Result<RecommendationOutcome> {
    let soil = normalize::normalize_soil(raw)?;

    let weather = ctx.weather.lookup(&soil.city).await?;

    let features = normalize::soil_features(&soil, &weather);
    let prediction = ctx.crop_model.predict(&features)?;

    // The response is authoritative from here on; the remaining stages
    // must not fail it.
    let prompt = narrative::crop_prompt(&prediction.label, &soil, &weather);
    let description = narrative::describe(ctx.generator.as_ref(), &prompt).await;

    record::record_outcome(
        &ctx.db_pool,
        farmer_id,
        PredictionKind::CropRecommendation,
        &soil.summary(),
        &prediction.label,
        None,
        &description,
    )
    .await;

    Ok(RecommendationOutcome {
        crop: prediction.label,
        description,
    })
}

/// Image-based disease diagnosis
///
/// Normalize (decode/resize/pool) -> infer -> narrate -> record. The
/// weather stage is skipped for this variant.
pub async fn diagnose(
    ctx: &AppContext,
    farmer_id: Option<Uuid>,
    filename: &str,
    image_bytes: &[u8],
) -> Result<DiagnosisOutcome> {
    let features = normalize::image_features(
        image_bytes,
        ctx.disease_model.input_size(),
        ctx.disease_model.grid(),
    )?;

    let prediction = ctx.disease_model.predict(&features)?;
    let disease = display_label(&prediction.label);
    // Classification always carries a probability
    let confidence = prediction.confidence.unwrap_or(0.0);

    let prompt = narrative::disease_prompt(&disease);
    let description = narrative::describe(ctx.generator.as_ref(), &prompt).await;

    record::record_outcome(
        &ctx.db_pool,
        farmer_id,
        PredictionKind::DiseaseDetection,
        filename,
        &disease,
        Some(confidence),
        &description,
    )
    .await;

    Ok(DiagnosisOutcome {
        disease,
        description,
        confidence,
    })
}
