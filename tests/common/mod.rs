/*!
 * Common test utilities for the pagebabel test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use pagebabel::app_config::{Config, TranslationProvider};
use pagebabel::providers::mock::MockProvider;
use pagebabel::translation::concurrency::RateLimiter;
use pagebabel::translation::{TranslationOptions, TranslationService};

/// Route library logs to the test output; safe to call from every test
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Pipeline options with no retry pause
pub fn fast_options(batch_size: usize, concurrent_batches: usize) -> TranslationOptions {
    TranslationOptions {
        batch_size,
        concurrent_batches,
        retry_pause: Duration::ZERO,
        ..TranslationOptions::default()
    }
}

/// Service around a mock provider; the mock keeps counting through its clones
pub fn mock_service(provider: &MockProvider, batch_size: usize, concurrent_batches: usize) -> TranslationService {
    TranslationService::with_provider(
        Arc::new(provider.clone()),
        RateLimiter::unlimited(4),
        fast_options(batch_size, concurrent_batches),
    )
}

/// Valid configuration using the mock provider
pub fn mock_config(target_language: &str) -> Config {
    let mut config = Config::default();
    config.target_language = target_language.to_string();
    config.translation.provider = TranslationProvider::Mock;
    config.translation.common.retry_pause_ms = 0;
    config
}
