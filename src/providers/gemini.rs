use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Gemini client for the Generative Language API
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL (defaults to the public API)
    endpoint: String,
    /// Model to generate with
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Client-side request timeout
    timeout: Duration,
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns; a single user turn here
    contents: Vec<GeminiContent>,

    /// Sampling parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One turn of content
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the author (user, model)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Content parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A text part
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// The text of the part
    #[serde(default)]
    pub text: String,
}

/// Sampling parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// generateContent response body
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// A generated candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Candidate content; absent when generation was blocked
    pub content: Option<GeminiContent>,

    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl GeminiRequest {
    /// Create a request with one user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: prompt.into() }],
            }],
            generation_config: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.generation_config = Some(GenerationConfig {
            temperature: Some(temperature),
        });
        self
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            temperature,
            timeout,
        }
    }

    fn api_url(&self, method: &str) -> String {
        let base = if self.endpoint.is_empty() {
            "https://generativelanguage.googleapis.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/v1beta/models/{}:{}", base, self.model, method)
    }

    /// Send a generateContent request
    pub async fn generate(&self, request: &GeminiRequest) -> Result<GeminiResponse, ProviderError> {
        let response = self.client.post(self.api_url("generateContent"))
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout)
                } else {
                    ProviderError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ProviderError::AuthenticationError(error_text)
                }
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(error_text),
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message: error_text,
                },
            });
        }

        response.json::<GeminiResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Gemini API response: {}", e)))
    }

    /// Extract text from the first candidate of a Gemini response
    pub fn extract_text_from_response(response: &GeminiResponse) -> Result<String, ProviderError> {
        let candidate = response.candidates.first()
            .ok_or_else(|| ProviderError::ParseError("Gemini returned no candidates".to_string()))?;

        let content = candidate.content.as_ref().ok_or_else(|| {
            ProviderError::ParseError(format!(
                "Gemini candidate has no content (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
        })?;

        Ok(content.parts.iter().map(|p| p.text.as_str()).collect())
    }
}

impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemini")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for Gemini {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GeminiRequest::new(prompt).temperature(self.temperature);
        let response = self.generate(&request).await?;
        let text = Self::extract_text_from_response(&response)?;
        debug!("Gemini returned {} chars", text.len());
        Ok(text)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = GeminiRequest::new("Reply with OK.");
        self.generate(&request).await.map(|_| ())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
