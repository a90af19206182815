/*!
 * One request/response cycle for a chunk of fragments.
 */

use log::debug;
use std::time::Duration;

use super::concurrency::RateLimiter;
use super::normalizer::TextUnit;
use super::parser::parse_batch_response;
use super::prompts::build_batch_prompt;
use crate::errors::{AttemptFailure, ProviderError};
use crate::providers::Provider;

/// Make one provider call under a limiter permit and a per-call timeout
pub(crate) async fn call_provider(
    provider: &dyn Provider,
    limiter: &RateLimiter,
    timeout: Duration,
    prompt: &str,
) -> Result<String, ProviderError> {
    let _permit = limiter.acquire().await?;
    match tokio::time::timeout(timeout, provider.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout(timeout)),
    }
}

/// A single, non-retried translation attempt for one chunk
#[derive(Debug, Clone, Copy)]
pub struct BatchAttempt<'a> {
    provider: &'a dyn Provider,
    limiter: &'a RateLimiter,
    target_language: &'a str,
    timeout: Duration,
}

impl<'a> BatchAttempt<'a> {
    pub fn new(
        provider: &'a dyn Provider,
        limiter: &'a RateLimiter,
        target_language: &'a str,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            limiter,
            target_language,
            timeout,
        }
    }

    /// Prompt for the units, call the provider once, and parse the answer
    ///
    /// Succeeds only with exactly one translation per unit; the list is never
    /// padded or cut to fit.
    pub async fn run(&self, units: &[TextUnit]) -> Result<Vec<String>, AttemptFailure> {
        let expected = units.len();
        let fragments: Vec<&str> = units.iter().map(TextUnit::normalized).collect();
        let prompt = build_batch_prompt(self.target_language, &fragments);

        let raw = call_provider(self.provider, self.limiter, self.timeout, &prompt).await?;
        debug!("{} raw:\n{}", self.provider.name(), raw);

        let parsed = parse_batch_response(&raw);
        match parsed.len() {
            actual if actual == expected => Ok(parsed),
            0 => Err(AttemptFailure::FormatMismatch { expected }),
            actual => Err(AttemptFailure::CountMismatch { expected, actual }),
        }
    }
}
