/*!
 * Tests for provider construction and behavior through the `Provider` trait
 */

use pagebabel::app_config::{TranslationConfig, TranslationProvider};
use pagebabel::errors::ProviderError;
use pagebabel::providers::gemini::Gemini;
use pagebabel::providers::mock::{MockBehavior, MockProvider, MockRequest};
use pagebabel::providers::ollama::Ollama;
use pagebabel::providers::{self, Provider};
use pagebabel::translation::prompts::{build_batch_prompt, build_single_prompt};
use std::time::Duration;

/// A local port nothing listens on
const CLOSED_ENDPOINT: &str = "http://127.0.0.1:1";

#[test]
fn test_fromConfig_shouldBuildActiveProvider() {
    let mut config = TranslationConfig::default();

    config.provider = TranslationProvider::Gemini;
    assert_eq!(providers::from_config(&config).unwrap().name(), "gemini");

    config.provider = TranslationProvider::Ollama;
    assert_eq!(providers::from_config(&config).unwrap().name(), "ollama");

    config.provider = TranslationProvider::Mock;
    assert_eq!(providers::from_config(&config).unwrap().name(), "mock");
}

#[test]
fn test_fromConfig_invalidOllamaEndpoint_shouldFail() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::Ollama;
    config.active_provider_config_mut().endpoint = "http://".to_string();

    assert!(providers::from_config(&config).is_err());
}

#[tokio::test]
async fn test_ollama_unreachable_shouldReportConnectionError() {
    let client = Ollama::new_with_config(CLOSED_ENDPOINT, "llama3.2:3b", 0.9, Duration::from_secs(2)).unwrap();

    let error = client.test_connection().await.unwrap_err();

    assert!(matches!(error, ProviderError::ConnectionError(_)), "got {:?}", error);
}

#[tokio::test]
async fn test_gemini_unreachable_shouldReportConnectionError() {
    let client = Gemini::new_with_config("key", CLOSED_ENDPOINT, "gemini-1.5-flash", 0.9, Duration::from_secs(2));

    let error = client.complete("Hello").await.unwrap_err();

    assert!(matches!(error, ProviderError::ConnectionError(_)), "got {:?}", error);
}

#[tokio::test]
async fn test_mock_asTraitObject_shouldAnswerBatchPrompt() {
    let provider: Box<dyn Provider> = Box::new(MockProvider::working());
    let response = provider.complete(&build_batch_prompt("Yoda", &["Hello", "Bye"])).await.unwrap();

    assert_eq!(response, "001 >>> [Yoda] Hello\n002 >>> [Yoda] Bye");
    assert!(provider.test_connection().await.is_ok());
}

#[tokio::test]
async fn test_mock_emptyBehavior_shouldReturnEmptyText() {
    let provider = MockProvider::new(MockBehavior::Empty);
    assert_eq!(provider.complete(&build_batch_prompt("x", &["a"])).await.unwrap(), "");
}

#[tokio::test]
async fn test_mock_failing_shouldFailConnectionCheck() {
    assert!(MockProvider::failing().test_connection().await.is_err());
}

#[test]
fn test_mockRequest_shouldRecoverItemsOfBothPromptKinds() {
    let batch = MockRequest::parse(&build_batch_prompt("Pig Latin", &["one", "two", "three"]));
    assert_eq!(batch.items.len(), 3);
    assert_eq!(batch.target_language, "Pig Latin");

    let single = MockRequest::parse(&build_single_prompt("solo", "Pig Latin"));
    assert!(single.single);
    assert_eq!(single.items, vec!["solo"]);
}
