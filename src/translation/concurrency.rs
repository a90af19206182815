/*!
 * Provider call throttling.
 *
 * Every call to the text-generation service goes through one shared
 * `RateLimiter`: a semaphore caps the calls in flight, and an optional
 * requests-per-minute limit spaces call starts evenly.
 */

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

use crate::errors::ProviderError;

/// Shared limiter for provider calls
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Bounds the number of calls in flight
    semaphore: Arc<Semaphore>,
    /// Minimum gap between two call starts
    interval: Option<Duration>,
    /// Earliest instant the next call may start
    next_slot: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a limiter for `max_in_flight` concurrent calls and an optional
    /// limit in requests per minute
    pub fn new(max_in_flight: usize, requests_per_minute: Option<u32>) -> Self {
        let interval = requests_per_minute
            .filter(|rpm| *rpm > 0)
            .map(|rpm| Duration::from_millis(60_000 / rpm as u64));

        Self {
            semaphore: Arc::new(Semaphore::new(max_in_flight.max(1))),
            interval,
            next_slot: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// A limiter that only bounds concurrency
    pub fn unlimited(max_in_flight: usize) -> Self {
        Self::new(max_in_flight, None)
    }

    /// Wait for a call slot; the call may proceed while the permit is held
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, ProviderError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| ProviderError::RateLimitExceeded(format!("Rate limiter error: {}", e)))?;

        if let Some(interval) = self.interval {
            let start_at = {
                let mut next_slot = self.next_slot.lock().await;
                let now = Instant::now();
                let start_at = (*next_slot).max(now);
                *next_slot = start_at + interval;
                start_at
            };
            tokio::time::sleep_until(start_at).await;
        }

        Ok(permit)
    }

    /// Permits currently free
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}
