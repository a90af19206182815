use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language; any free-form name, fictional ones included
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Environment variable consulted when no Gemini API key is configured
pub const GEMINI_KEY_ENV: &str = "GEMINI_KEY";

/// Largest batch the three-digit line index of the wire format can address
pub const MAX_BATCH_SIZE: usize = 999;

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Ollama
    Ollama,
    // @provider: Offline echo provider
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Ollama => "Ollama",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max provider calls in flight at once
    #[serde(default = "default_max_in_flight_requests")]
    pub max_in_flight_requests: usize,

    // @field: Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Gemini => Self {
                provider_type: "gemini".to_string(),
                model: default_gemini_model(),
                api_key: String::new(),
                endpoint: default_gemini_endpoint(),
                timeout_secs: default_timeout_secs(),
                max_in_flight_requests: default_max_in_flight_requests(),
                rate_limit: default_gemini_rate_limit(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_ollama_timeout_secs(),
                max_in_flight_requests: default_max_in_flight_requests(),
                rate_limit: None,
            },
            TranslationProvider::Mock => Self {
                provider_type: "mock".to_string(),
                model: "echo".to_string(),
                api_key: String::new(),
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
                max_in_flight_requests: default_max_in_flight_requests(),
                rate_limit: None,
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Pipeline settings applicable to all providers
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Pipeline settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Maximum fragments per top-level batch (at most 999)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Attempts per chunk before it is split or falls back
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed pause between two attempts on the same chunk, in milliseconds
    #[serde(default = "default_retry_pause_ms")]
    pub retry_pause_ms: u64,

    /// Fragments longer than this are truncated before prompting
    #[serde(default = "default_max_fragment_chars")]
    pub max_fragment_chars: usize,

    /// Top-level batches translated at the same time
    #[serde(default = "default_concurrent_batches")]
    pub concurrent_batches: usize,

    /// Temperature parameter for text generation
    /// Higher values make output more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            retry_pause_ms: default_retry_pause_ms(),
            max_fragment_chars: default_max_fragment_chars(),
            concurrent_batches: default_concurrent_batches(),
            temperature: default_temperature(),
        }
    }
}

impl TranslationCommonConfig {
    /// Pause between attempts as a duration
    pub fn retry_pause(&self) -> Duration {
        Duration::from_millis(self.retry_pause_ms)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_batch_size() -> usize {
    500
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_pause_ms() -> u64 {
    1500
}

fn default_max_fragment_chars() -> usize {
    300
}

fn default_concurrent_batches() -> usize {
    1 // sequential, one batch after another
}

fn default_max_in_flight_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.9
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_gemini_rate_limit() -> Option<u32> {
    // Free tier allows 15 requests per minute
    Some(15)
}

impl Config {
    /// Load a configuration file, or write and return the defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok((config, true))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language cannot be empty"));
        }

        let common = &self.translation.common;
        if common.batch_size == 0 || common.batch_size > MAX_BATCH_SIZE {
            return Err(anyhow!(
                "batch_size must be between 1 and {} (got {})",
                MAX_BATCH_SIZE,
                common.batch_size
            ));
        }
        if common.max_retries == 0 {
            return Err(anyhow!("max_retries must be at least 1"));
        }
        if common.max_fragment_chars == 0 {
            return Err(anyhow!("max_fragment_chars must be at least 1"));
        }
        if common.concurrent_batches == 0 {
            return Err(anyhow!("concurrent_batches must be at least 1"));
        }
        if self.translation.get_max_in_flight_requests() == 0 {
            return Err(anyhow!("max_in_flight_requests must be at least 1"));
        }

        match self.translation.provider {
            TranslationProvider::Gemini => {
                if self.translation.get_api_key().is_empty() {
                    return Err(anyhow!(
                        "Translation API key is required for Gemini provider (set it in the config or {})",
                        GEMINI_KEY_ENV
                    ));
                }
                parse_endpoint(&self.translation.get_endpoint())?;
            }
            TranslationProvider::Ollama => {
                parse_endpoint(&self.translation.get_endpoint())?;
            }
            TranslationProvider::Mock => {}
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: "Pirate".to_string(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

/// Parse an endpoint string into a base URL, adding `http://` when no scheme is given
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(url)
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, inserting defaults when missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(position) => position,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[position]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        ProviderConfig::new(self.provider).model
    }

    /// Get the API key for the active provider
    ///
    /// Gemini falls back to the `GEMINI_KEY` environment variable.
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        match self.provider {
            TranslationProvider::Gemini => std::env::var(GEMINI_KEY_ENV).unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        ProviderConfig::new(self.provider).endpoint
    }

    /// Get the per-call timeout for the active provider
    pub fn get_timeout(&self) -> Duration {
        let secs = self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(|| ProviderConfig::new(self.provider).timeout_secs);
        Duration::from_secs(secs)
    }

    /// Get the in-flight request bound for the active provider
    pub fn get_max_in_flight_requests(&self) -> usize {
        self.get_active_provider_config()
            .map(|p| p.max_in_flight_requests)
            .unwrap_or_else(default_max_in_flight_requests)
    }

    /// Get the rate limit for the active provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        if let Some(provider_config) = self.get_active_provider_config() {
            return provider_config.rate_limit;
        }

        ProviderConfig::new(self.provider).rate_limit
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Gemini),
                ProviderConfig::new(TranslationProvider::Ollama),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
