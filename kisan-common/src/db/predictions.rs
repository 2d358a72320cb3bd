//! Prediction record queries
//!
//! Records are append-only: one row per completed prediction, owned by
//! exactly one farmer. No update-in-place occurs anywhere.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

/// Kind of prediction a record captures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionKind {
    CropRecommendation,
    DiseaseDetection,
}

impl PredictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionKind::CropRecommendation => "crop_recommendation",
            PredictionKind::DiseaseDetection => "disease_detection",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "crop_recommendation" => Some(PredictionKind::CropRecommendation),
            "disease_detection" => Some(PredictionKind::DiseaseDetection),
            _ => None,
        }
    }
}

/// A stored prediction record
#[derive(Debug, Clone)]
pub struct PredictionRecord {
    pub prediction_id: Uuid,
    pub farmer_id: Uuid,
    pub kind: PredictionKind,
    /// Compact human-readable summary of the inputs (soil values or filename)
    pub input_summary: String,
    pub label: String,
    /// Confidence on a 0-100 scale; absent for the recommendation variant
    pub confidence: Option<f64>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Insert one prediction record, returning its id
pub async fn insert_prediction(
    db: &Pool<Sqlite>,
    farmer_id: Uuid,
    kind: PredictionKind,
    input_summary: &str,
    label: &str,
    confidence: Option<f64>,
    description: &str,
) -> Result<Uuid> {
    let prediction_id = Uuid::new_v4();
    let created_at = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO predictions
            (prediction_id, farmer_id, kind, input_summary, label, confidence, description, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(prediction_id.to_string())
    .bind(farmer_id.to_string())
    .bind(kind.as_str())
    .bind(input_summary)
    .bind(label)
    .bind(confidence)
    .bind(description)
    .bind(created_at.to_rfc3339())
    .execute(db)
    .await?;

    Ok(prediction_id)
}

/// Fetch a farmer's prediction records, newest first
pub async fn list_predictions_for_farmer(
    db: &Pool<Sqlite>,
    farmer_id: Uuid,
    limit: i64,
) -> Result<Vec<PredictionRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT prediction_id, farmer_id, kind, input_summary, label, confidence, description, created_at
        FROM predictions
        WHERE farmer_id = ?
        ORDER BY created_at DESC
        LIMIT ?
        "#,
    )
    .bind(farmer_id.to_string())
    .bind(limit)
    .fetch_all(db)
    .await?;

    rows.into_iter().map(row_to_record).collect()
}

fn row_to_record(row: sqlx::sqlite::SqliteRow) -> Result<PredictionRecord> {
    let prediction_id: String = row.try_get("prediction_id")?;
    let farmer_id: String = row.try_get("farmer_id")?;
    let kind: String = row.try_get("kind")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(PredictionRecord {
        prediction_id: Uuid::parse_str(&prediction_id)
            .map_err(|e| Error::Internal(format!("Bad prediction_id in database: {}", e)))?,
        farmer_id: Uuid::parse_str(&farmer_id)
            .map_err(|e| Error::Internal(format!("Bad farmer_id in database: {}", e)))?,
        kind: PredictionKind::parse(&kind)
            .ok_or_else(|| Error::Internal(format!("Unknown prediction kind: {}", kind)))?,
        input_summary: row.try_get("input_summary")?,
        label: row.try_get("label")?,
        confidence: row.try_get("confidence")?,
        description: row.try_get("description")?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| Error::Internal(format!("Bad created_at in database: {}", e)))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::farmers::insert_farmer;
    use crate::db::init::create_schema;
    use sqlx::SqlitePool;

    async fn pool_with_farmer() -> (SqlitePool, Uuid) {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();
        let farmer_id = insert_farmer(&pool, "Asha", "asha@example.com", "deadbeef", "Nagpur")
            .await
            .unwrap();
        (pool, farmer_id)
    }

    #[tokio::test]
    async fn insert_and_list_newest_first() {
        let (pool, farmer_id) = pool_with_farmer().await;

        insert_prediction(
            &pool,
            farmer_id,
            PredictionKind::CropRecommendation,
            "N=90 P=42 K=43 ph=6.5 city=Nagpur",
            "rice",
            None,
            "Rice suits these conditions.",
        )
        .await
        .unwrap();

        insert_prediction(
            &pool,
            farmer_id,
            PredictionKind::DiseaseDetection,
            "leaf.jpg",
            "Tomato - Late blight",
            Some(91.27),
            "Remove affected leaves.",
        )
        .await
        .unwrap();

        let records = list_predictions_for_farmer(&pool, farmer_id, 50).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, PredictionKind::DiseaseDetection);
        assert_eq!(records[0].confidence, Some(91.27));
        assert_eq!(records[1].label, "rice");
        assert_eq!(records[1].confidence, None);
    }

    #[tokio::test]
    async fn identical_inputs_create_independent_rows() {
        let (pool, farmer_id) = pool_with_farmer().await;

        for _ in 0..2 {
            insert_prediction(
                &pool,
                farmer_id,
                PredictionKind::CropRecommendation,
                "N=90 P=42 K=43 ph=6.5 city=Nagpur",
                "rice",
                None,
                "Rice suits these conditions.",
            )
            .await
            .unwrap();
        }

        let records = list_predictions_for_farmer(&pool, farmer_id, 50).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].prediction_id, records[1].prediction_id);
    }

    #[tokio::test]
    async fn list_scoped_to_owner() {
        let (pool, farmer_id) = pool_with_farmer().await;
        let other = insert_farmer(&pool, "Ravi", "ravi@example.com", "cafebabe", "Pune")
            .await
            .unwrap();

        insert_prediction(
            &pool,
            farmer_id,
            PredictionKind::CropRecommendation,
            "N=90 P=42 K=43 ph=6.5 city=Nagpur",
            "rice",
            None,
            "Rice suits these conditions.",
        )
        .await
        .unwrap();

        assert!(list_predictions_for_farmer(&pool, other, 50).await.unwrap().is_empty());
    }
}
