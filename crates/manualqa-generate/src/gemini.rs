//! Gemini `generateContent` client with retry, exponential backoff and a
//! request timeout. Dropping the in-flight future cancels the request.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use manualqa_core::error::{Error, Result};
use manualqa_core::traits::GenerationClient;

/// Transport configuration for the generation service.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the API, without the model path.
    pub base_url: String,
    /// Model name, e.g. `gemini-2.0-flash`.
    pub model: String,
    pub api_key: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry).
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

#[derive(Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::InvalidArgument("generation api key is not set".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::GenerationUnavailable(format!("http client: {e}")))?;
        Ok(Self { config, client })
    }
}

fn extract_text(resp: GenerateResponse) -> Result<String> {
    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| Error::GenerationUnavailable("empty generation response".to_string()))
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
            generation_config: GenerationConfig { max_output_tokens: max_tokens },
        };

        let mut backoff = self.config.initial_backoff;
        let mut last_err = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!(attempt, max = self.config.max_retries, backoff_ms = backoff.as_millis() as u64, "retrying generation request");
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(self.config.max_backoff);
            }

            match self.client.post(&url).json(&body).send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let parsed: GenerateResponse = resp.json().await.map_err(|e| {
                            Error::GenerationUnavailable(format!("deserialization failed: {e}"))
                        })?;
                        return extract_text(parsed);
                    }
                    // 429 is worth retrying; any other 4xx means the request
                    // itself is broken and repeats will not help
                    if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let body_text = resp.text().await.unwrap_or_default();
                        return Err(Error::GenerationUnavailable(format!("HTTP {status}: {body_text}")));
                    }
                    last_err = format!("HTTP {status}");
                    warn!(attempt, %status, "generation request failed");
                }
                Err(e) => {
                    last_err = e.to_string();
                    warn!(attempt, error = %last_err, "generation request failed");
                }
            }
        }

        Err(Error::GenerationUnavailable(format!(
            "all {} retries exhausted: {last_err}",
            self.config.max_retries
        )))
    }
}
