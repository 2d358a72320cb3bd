//! Input normalization
//!
//! Pure transforms from caller-supplied data into the shapes the models
//! expect. Soil input is validated field-by-field so rejections can name
//! the offending field; image input is decoded, resized to the model's
//! input resolution, scaled to [0,1] and mean-pooled into the model's
//! feature layout.

use image::imageops::FilterType;
use serde_json::Value;
use thiserror::Error;

use crate::services::WeatherSnapshot;

/// Validation failures, surfaced before any external call is made
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field must be a number: {0}")]
    BadType(&'static str),

    #[error("Field must be a non-empty string: {0}")]
    EmptyField(&'static str),

    #[error("Could not decode image: {0}")]
    BadImage(String),
}

/// Validated soil measurements plus the location to enrich from
#[derive(Debug, Clone, PartialEq)]
pub struct SoilInput {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub ph: f64,
    pub city: String,
}

impl SoilInput {
    /// Compact summary for the stored record
    pub fn summary(&self) -> String {
        format!(
            "N={} P={} K={} ph={} city={}",
            self.n, self.p, self.k, self.ph, self.city
        )
    }
}

/// Validate raw JSON into a `SoilInput`
///
/// Requires numeric `N`, `P`, `K`, `ph` and a non-empty `city`.
pub fn normalize_soil(raw: &Value) -> Result<SoilInput, ValidationError> {
    let n = require_number(raw, "N")?;
    let p = require_number(raw, "P")?;
    let k = require_number(raw, "K")?;
    let ph = require_number(raw, "ph")?;

    let city = match raw.get("city") {
        None | Some(Value::Null) => return Err(ValidationError::MissingField("city")),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err(ValidationError::EmptyField("city")),
    };
    if city.is_empty() {
        return Err(ValidationError::EmptyField("city"));
    }

    Ok(SoilInput { n, p, k, ph, city })
}

fn require_number(raw: &Value, field: &'static str) -> Result<f64, ValidationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(v) => v.as_f64().ok_or(ValidationError::BadType(field)),
    }
}

/// Assemble the crop model's feature vector
///
/// Order is fixed by training: `[N, P, K, temperature, humidity, ph, rainfall]`.
pub fn soil_features(soil: &SoilInput, weather: &WeatherSnapshot) -> Vec<f64> {
    vec![
        soil.n,
        soil.p,
        soil.k,
        weather.temperature_c,
        weather.humidity_pct,
        soil.ph,
        weather.rainfall_mm,
    ]
}

/// Decode an uploaded image into the disease model's feature vector
///
/// The payload is fully buffered before this is called, so stream rewind
/// concerns do not arise here. A sniff check rejects obvious non-images
/// before the decoder runs.
pub fn image_features(
    bytes: &[u8],
    input_size: u32,
    grid: u32,
) -> Result<Vec<f64>, ValidationError> {
    if bytes.is_empty() {
        return Err(ValidationError::BadImage("empty payload".to_string()));
    }

    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => {}
        Some(kind) => {
            return Err(ValidationError::BadImage(format!(
                "not an image: detected {}",
                kind.mime_type()
            )))
        }
        None => {
            return Err(ValidationError::BadImage(
                "unrecognized file format".to_string(),
            ))
        }
    }

    let img = image::load_from_memory(bytes)
        .map_err(|e| ValidationError::BadImage(e.to_string()))?;

    let resized = img
        .resize_exact(input_size, input_size, FilterType::Triangle)
        .to_rgb8();

    // Mean-pool [0,1] pixels into grid x grid cells, channel-major within
    // each cell: features are laid out cell-by-cell as [r, g, b].
    let cell = input_size / grid;
    let cell_area = (cell * cell) as f64;
    let mut features = Vec::with_capacity((grid * grid * 3) as usize);

    for gy in 0..grid {
        for gx in 0..grid {
            let mut sums = [0.0f64; 3];
            for y in 0..cell {
                for x in 0..cell {
                    let px = resized.get_pixel(gx * cell + x, gy * cell + y);
                    sums[0] += px[0] as f64 / 255.0;
                    sums[1] += px[1] as f64 / 255.0;
                    sums[2] += px[2] as f64 / 255.0;
                }
            }
            features.push(sums[0] / cell_area);
            features.push(sums[1] / cell_area);
            features.push(sums[2] / cell_area);
        }
    }

    Ok(features)
}
