/*!
 * Provider implementations for different text-generation services.
 *
 * This module contains client implementations for the supported backends:
 * - Gemini: Google Generative Language API
 * - Ollama: Local LLM server
 * - Mock: Deterministic in-process provider for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all text-generation providers
///
/// A provider takes one opaque prompt and returns the raw generated text.
/// It performs exactly one best-effort call: retries, splitting and timeouts
/// belong to the translation pipeline, so any backend honouring this contract
/// can be swapped in.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Send a prompt and return the raw response text
    ///
    /// # Arguments
    /// * `prompt` - The complete prompt
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The generated text or an error
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}

/// Build the configured provider once at startup
pub fn from_config(config: &TranslationConfig) -> anyhow::Result<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::Gemini => Arc::new(gemini::Gemini::new_with_config(
            config.get_api_key(),
            config.get_endpoint(),
            config.get_model(),
            config.common.temperature,
            config.get_timeout(),
        )),
        TranslationProvider::Ollama => Arc::new(ollama::Ollama::new_with_config(
            &config.get_endpoint(),
            config.get_model(),
            config.common.temperature,
            config.get_timeout(),
        )?),
        TranslationProvider::Mock => Arc::new(mock::MockProvider::working()),
    };

    Ok(provider)
}

pub mod gemini;
pub mod mock;
pub mod ollama;
