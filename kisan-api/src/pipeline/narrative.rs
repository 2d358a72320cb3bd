//! Narrative generation
//!
//! Turns a structured prediction into farmer-facing text through the
//! generative provider. Strictly best-effort: one attempt, and any failure
//! degrades to a fixed fallback sentence instead of failing the request.

use crate::pipeline::normalize::SoilInput;
use crate::services::{TextGenerator, WeatherSnapshot};

/// Returned whenever the generative provider cannot produce text
pub const FALLBACK_DESCRIPTION: &str = "Sorry, I couldn't generate a description at this time.";

/// Prompt for the crop recommendation variant
pub fn crop_prompt(label: &str, soil: &SoilInput, weather: &WeatherSnapshot) -> String {
    format!(
        "Based on agricultural data where a model recommended '{label}', \
         provide a concise, helpful recommendation for a farmer in India. \
         Include why '{label}' is suitable and 1-2 important cultivation tips. \
         Keep it to 3-4 sentences. \
         Data: N={n}, P={p}, K={k}, ph={ph}, temperature={temp}C, \
         humidity={hum}%, rainfall={rain}mm, city={city}",
        label = label,
        n = soil.n,
        p = soil.p,
        k = soil.k,
        ph = soil.ph,
        temp = weather.temperature_c,
        hum = weather.humidity_pct,
        rain = weather.rainfall_mm,
        city = soil.city,
    )
}

/// Prompt for the disease detection variant
pub fn disease_prompt(display_label: &str) -> String {
    format!(
        "A plant leaf is identified as having '{display_label}'. \
         Provide a practical guide for a farmer in India. \
         Include a simple description and 2-3 actionable treatment steps \
         (organic and chemical). Keep it to 3-4 sentences.",
    )
}

/// Generate a description, absorbing provider failures
pub async fn describe(generator: &dyn TextGenerator, prompt: &str) -> String {
    match generator.generate(prompt).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Narrative generation failed, using fallback: {}", e);
            FALLBACK_DESCRIPTION.to_string()
        }
    }
}
