/*!
 * Tests for application configuration functionality
 */

use pagebabel::app_config::{
    Config, LogLevel, ProviderConfig, TranslationProvider, GEMINI_KEY_ENV, MAX_BATCH_SIZE,
};
use std::time::Duration;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.target_language, "Pirate");
    assert_eq!(config.translation.provider, TranslationProvider::Gemini);
    assert_eq!(config.log_level, LogLevel::Info);

    let common = &config.translation.common;
    assert_eq!(common.batch_size, 500);
    assert_eq!(common.max_retries, 2);
    assert_eq!(common.retry_pause(), Duration::from_millis(1500));
    assert_eq!(common.max_fragment_chars, 300);
    assert_eq!(common.concurrent_batches, 1);

    let gemini = config.translation.get_provider_config(&TranslationProvider::Gemini)
        .expect("Gemini provider config should exist");
    assert_eq!(gemini.model, "gemini-1.5-flash");
    assert_eq!(gemini.rate_limit, Some(15));

    let ollama = config.translation.get_provider_config(&TranslationProvider::Ollama)
        .expect("Ollama provider config should exist");
    assert_eq!(ollama.endpoint, "http://localhost:11434");
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = common::mock_config("Klingon");
    assert!(config.validate().is_ok());

    config.target_language = "  ".to_string();
    assert!(config.validate().is_err());
    config.target_language = "Klingon".to_string();

    config.translation.common.batch_size = 0;
    assert!(config.validate().is_err());
    config.translation.common.batch_size = MAX_BATCH_SIZE + 1;
    assert!(config.validate().is_err());
    config.translation.common.batch_size = MAX_BATCH_SIZE;
    assert!(config.validate().is_ok());

    config.translation.common.max_retries = 0;
    assert!(config.validate().is_err());
    config.translation.common.max_retries = 1;

    config.translation.common.concurrent_batches = 0;
    assert!(config.validate().is_err());
    config.translation.common.concurrent_batches = 3;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_gemini_shouldNeedApiKey() {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().api_key = String::new();

    if std::env::var(GEMINI_KEY_ENV).is_err() {
        assert!(config.validate().is_err());
    }

    config.translation.active_provider_config_mut().api_key = "secret".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_badOllamaEndpoint_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.active_provider_config_mut().endpoint = "http://".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn test_deserialize_partialJson_shouldFillDefaults() {
    let json = r#"{
        "target_language": "Elvish",
        "translation": {
            "provider": "ollama",
            "available_providers": [{ "type": "ollama", "model": "mistral" }],
            "common": { "batch_size": 50 }
        }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_model(), "mistral");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.common.batch_size, 50);
    assert_eq!(config.translation.common.max_retries, 2);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_loadOrCreate_missingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&path).unwrap();
    assert!(created);
    assert!(path.exists());
    assert_eq!(config.target_language, "Pirate");

    let (reloaded, created) = Config::load_or_create(&path).unwrap();
    assert!(!created);
    assert_eq!(reloaded.translation.common.batch_size, config.translation.common.batch_size);
}

#[test]
fn test_loadOrCreate_invalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_provider_fromStr_shouldBeCaseInsensitive() {
    assert_eq!("Gemini".parse::<TranslationProvider>().unwrap(), TranslationProvider::Gemini);
    assert_eq!("OLLAMA".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert!("openai".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Mock.to_string(), "mock");
}

#[test]
fn test_timeout_zero_shouldFallBackToProviderDefault() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.active_provider_config_mut().timeout_secs = 0;

    assert_eq!(
        config.translation.get_timeout(),
        Duration::from_secs(ProviderConfig::new(TranslationProvider::Ollama).timeout_secs)
    );
}
