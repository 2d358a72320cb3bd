//! Gemini generative-text API client
//!
//! Single-attempt text generation through the `generateContent` endpoint.
//! Callers absorb every failure into a fallback string; this client only
//! reports what went wrong.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GenerateError, TextGenerator};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.0-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Gemini API client
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, GenerateError> {
        Self::with_base_url(api_key, GEMINI_BASE_URL.to_string())
    }

    /// Construct against a non-default base URL (test servers)
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, GenerateError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenerateError::Unavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, GEMINI_MODEL
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerateError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Unavailable(format!("Bad response body: {}", e)))?;

        let text = parsed
            .candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|mut c| if c.parts.is_empty() { None } else { Some(c.parts.remove(0)) })
            .map(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerateError::EmptyResponse);
        }

        Ok(text)
    }
}
