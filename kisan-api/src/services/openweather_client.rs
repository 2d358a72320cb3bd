//! OpenWeatherMap API client
//!
//! Resolves a city name to current temperature, humidity and rainfall via
//! the `/data/2.5/weather` endpoint. One bounded request per lookup: no
//! retry, no caching, no default substitution on failure.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{WeatherError, WeatherProvider, WeatherSnapshot};

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Current-weather response (subset of the OpenWeatherMap payload)
#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    rain: Option<OwmRain>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    /// Temperature in Celsius (`units=metric`)
    temp: f64,
    /// Relative humidity in percent
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    /// Rainfall over the last hour in mm
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    /// Rainfall over the last three hours in mm
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

/// OpenWeatherMap client
pub struct OpenWeatherClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL.to_string())
    }

    /// Construct against a non-default base URL (test servers)
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, WeatherError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WeatherError::Unavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn lookup(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        tracing::debug!(city = %city, "Querying OpenWeatherMap");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", city), ("appid", &self.api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| WeatherError::Unavailable(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WeatherError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: OwmResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Unavailable(format!("Bad response body: {}", e)))?;

        let rainfall_mm = body
            .rain
            .and_then(|r| r.one_hour.or(r.three_hours))
            .unwrap_or(0.0);

        let snapshot = WeatherSnapshot {
            temperature_c: body.main.temp,
            humidity_pct: body.main.humidity,
            rainfall_mm,
        };

        tracing::info!(
            city = %city,
            temperature_c = snapshot.temperature_c,
            humidity_pct = snapshot.humidity_pct,
            rainfall_mm = snapshot.rainfall_mm,
            "Resolved weather for city"
        );

        Ok(snapshot)
    }
}
