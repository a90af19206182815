/*!
 * Core translation service implementation.
 *
 * `TranslationService` owns the provider handle, the shared rate limiter and
 * the pipeline options. It is the entry point for both the batch pipeline and
 * the single-text path.
 */

use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{TranslationCommonConfig, TranslationConfig};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{self, Provider};

use super::attempt::{call_provider, BatchAttempt};
use super::batch::BatchTranslator;
use super::concurrency::RateLimiter;
use super::engine::{AdaptiveRetryEngine, RetryPolicy};
use super::parser::extract_labeled_translation;
use super::prompts::build_single_prompt;

/// Counters collected while translating
#[derive(Debug, Clone)]
pub struct TranslationStats {
    /// Provider calls made, successful or not
    pub requests: usize,

    /// Attempts repeated after a failure
    pub retries: usize,

    /// Attempts rejected for a wrong line count or format
    pub mismatches: usize,

    /// Attempts that failed at the service
    pub service_errors: usize,

    /// Chunks split in half
    pub splits: usize,

    /// Fragments left untranslated
    pub fallbacks: usize,

    /// Fragments translated by the service
    pub translated: usize,

    /// Start time of the run
    pub start_time: Instant,
}

impl Default for TranslationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationStats {
    pub fn new() -> Self {
        Self {
            requests: 0,
            retries: 0,
            mismatches: 0,
            service_errors: 0,
            splits: 0,
            fallbacks: 0,
            translated: 0,
            start_time: Instant::now(),
        }
    }

    /// Fold the counters of another run into this one
    pub fn merge(&mut self, other: &TranslationStats) {
        self.requests += other.requests;
        self.retries += other.retries;
        self.mismatches += other.mismatches;
        self.service_errors += other.service_errors;
        self.splits += other.splits;
        self.fallbacks += other.fallbacks;
        self.translated += other.translated;
        self.start_time = self.start_time.min(other.start_time);
    }

    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Translation Summary:\n\
             Fragments translated: {}\n\
             Fragments kept as original: {}\n\
             Requests: {} ({} retries, {} splits)\n\
             Mismatched responses: {}\n\
             Service errors: {}\n\
             Elapsed time: {:.2} seconds",
            self.translated,
            self.fallbacks,
            self.requests,
            self.retries,
            self.splits,
            self.mismatches,
            self.service_errors,
            self.start_time.elapsed().as_secs_f64()
        )
    }
}

/// Pipeline options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Fragments per top-level batch
    pub batch_size: usize,

    /// Attempts per chunk before splitting
    pub max_retries: u32,

    /// Fixed pause before each retry
    pub retry_pause: Duration,

    /// Maximum characters of a normalized fragment
    pub max_fragment_chars: usize,

    /// Top-level batches processed at the same time
    pub concurrent_batches: usize,

    /// Upper bound on a single provider call
    pub request_timeout: Duration,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self::from_common(&TranslationCommonConfig::default(), Duration::from_secs(60))
    }
}

impl TranslationOptions {
    /// Options from the shared config section and a per-call timeout
    pub fn from_common(common: &TranslationCommonConfig, request_timeout: Duration) -> Self {
        Self {
            batch_size: common.batch_size,
            max_retries: common.max_retries,
            retry_pause: common.retry_pause(),
            max_fragment_chars: common.max_fragment_chars,
            concurrent_batches: common.concurrent_batches,
            request_timeout,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.max(1),
            pause: self.retry_pause,
        }
    }
}

/// Main translation service
#[derive(Clone)]
pub struct TranslationService {
    /// Text-generation backend
    provider: Arc<dyn Provider>,

    /// Shared by every call the service makes
    limiter: RateLimiter,

    /// Pipeline options
    pub options: TranslationOptions,
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("provider", &self.provider.name())
            .field("options", &self.options)
            .finish()
    }
}

impl TranslationService {
    /// Create a new translation service from the translation config
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let provider = providers::from_config(config)?;
        let limiter = RateLimiter::new(config.get_max_in_flight_requests(), config.get_rate_limit());
        let options = TranslationOptions::from_common(&config.common, config.get_timeout());

        info!(
            "Using {} ({}), batch size {}, {} concurrent batch(es)",
            config.provider.display_name(),
            config.get_model(),
            options.batch_size,
            options.concurrent_batches
        );

        Ok(Self::with_provider(provider, limiter, options))
    }

    /// Create a service around an existing provider
    pub fn with_provider(provider: Arc<dyn Provider>, limiter: RateLimiter, options: TranslationOptions) -> Self {
        Self { provider, limiter, options }
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Engine for one top-level batch into `target_language`
    pub fn engine<'a>(&'a self, target_language: &'a str) -> AdaptiveRetryEngine<'a> {
        let attempt = BatchAttempt::new(
            self.provider.as_ref(),
            &self.limiter,
            target_language,
            self.options.request_timeout,
        );
        AdaptiveRetryEngine::new(attempt, self.options.retry_policy())
    }

    /// Check that the backend is reachable
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.provider.test_connection().await
    }

    /// Translate fragments in batches; one output per input, same order
    pub async fn translate_fragments<S: AsRef<str>>(
        &self,
        fragments: &[S],
        target_language: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let (translations, stats) = BatchTranslator::new(self.clone())
            .translate_fragments(fragments, target_language, |_, _| {})
            .await?;
        debug!("{}", stats.summary());
        Ok(translations)
    }

    /// Translate one string with the labeled single-item contract
    ///
    /// No retries and no fallback: a call failure or a response without the
    /// label is returned as an error.
    pub async fn translate_text(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let prompt = build_single_prompt(text, target_language);
        let raw = call_provider(
            self.provider.as_ref(),
            &self.limiter,
            self.options.request_timeout,
            &prompt,
        )
        .await?;
        debug!("{} raw:\n{}", self.provider.name(), raw);

        extract_labeled_translation(&raw)
    }
}
