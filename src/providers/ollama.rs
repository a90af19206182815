use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::parse_endpoint;
use crate::errors::ProviderError;
use crate::providers::Provider;

/// Ollama client for interacting with Ollama API
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model name to use for generation
    model: String,
    /// Sampling temperature
    temperature: f32,
    /// Client-side request timeout
    timeout: Duration,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: None,
            stream: Some(false),
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

impl Ollama {
    /// Create a new Ollama client with configuration
    ///
    /// Ollama uses HTTP/1.1, so the client is pinned to it.
    pub fn new_with_config(
        endpoint: &str,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = parse_endpoint(endpoint)?.as_str().trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            client: Client::builder()
                .timeout(timeout)
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            model: model.into(),
            temperature,
            timeout,
        })
    }

    fn map_send_error(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::from(error)
        }
    }

    /// Generate text from the Ollama API
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self.client.post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let response_text = response.text().await
            .map_err(|e| self.map_send_error(e))?;

        Self::parse_generation(&response_text)
    }

    /// Parse a generate response body
    ///
    /// A streamed (JSONL) body is accepted as well: the `response` pieces are
    /// concatenated in order.
    pub fn parse_generation(body: &str) -> Result<GenerationResponse, ProviderError> {
        if let Ok(parsed) = serde_json::from_str::<GenerationResponse>(body) {
            return Ok(parsed);
        }

        let mut full_response = String::new();
        let mut model = String::new();
        let mut done = false;
        let mut any = false;
        for line in body.lines().filter(|l| !l.trim().is_empty()) {
            let piece: GenerationResponse = serde_json::from_str(line).map_err(|e| {
                ProviderError::ParseError(format!("Failed to parse Ollama API response: {}", e))
            })?;
            full_response.push_str(&piece.response);
            model = piece.model;
            done = piece.done;
            any = true;
        }

        if !any {
            return Err(ProviderError::ParseError("Ollama returned an empty body".to_string()));
        }

        Ok(GenerationResponse {
            model,
            response: full_response,
            done,
            prompt_eval_count: None,
            eval_count: None,
        })
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self.client.get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e)))?;

        response["version"].as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

impl std::fmt::Debug for Ollama {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ollama")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for Ollama {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = GenerationRequest::new(self.model.clone(), prompt).temperature(self.temperature);
        let response = self.generate(&request).await?;
        debug!(
            "Ollama returned {} chars ({:?} prompt tokens, {:?} completion tokens)",
            response.response.len(),
            response.prompt_eval_count,
            response.eval_count
        );
        Ok(response.response)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to Ollama {}", version);
        Ok(())
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
