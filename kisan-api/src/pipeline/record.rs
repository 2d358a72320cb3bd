//! Outcome recording
//!
//! Best-effort persistence of completed predictions. The response to the
//! caller is already computed by the time this runs; a write error is
//! logged and swallowed, never re-raised past the pipeline.

use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use kisan_common::db::predictions::{insert_prediction, PredictionKind};

/// Write one prediction record, tagged with the owning farmer
///
/// Skipped entirely for anonymous callers (no owner, no record).
pub async fn record_outcome(
    db: &Pool<Sqlite>,
    farmer_id: Option<Uuid>,
    kind: PredictionKind,
    input_summary: &str,
    label: &str,
    confidence: Option<f64>,
    description: &str,
) {
    let Some(farmer_id) = farmer_id else {
        tracing::debug!("Anonymous caller, skipping prediction record");
        return;
    };

    match insert_prediction(db, farmer_id, kind, input_summary, label, confidence, description)
        .await
    {
        Ok(prediction_id) => {
            tracing::debug!(
                prediction_id = %prediction_id,
                farmer_id = %farmer_id,
                kind = kind.as_str(),
                "Stored prediction record"
            );
        }
        Err(e) => {
            // Lossy by policy: persistence never affects the response.
            tracing::error!(
                farmer_id = %farmer_id,
                kind = kind.as_str(),
                "Failed to store prediction record: {}",
                e
            );
        }
    }
}
