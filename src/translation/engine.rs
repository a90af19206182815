/*!
 * Adaptive retry engine.
 *
 * A chunk of fragments is attempted up to `max_retries` times. A chunk that
 * keeps failing is split in half and each half is handled the same way, left
 * half first. A single fragment that keeps failing falls back to its original,
 * unnormalized text. Pending chunks live on an explicit work stack and every
 * result is written into the slot of the fragment it belongs to, so the
 * output order never depends on the order chunks finish in.
 */

use log::{error, info, warn};
use std::ops::Range;
use std::time::Duration;

use super::attempt::BatchAttempt;
use super::core::TranslationStats;
use super::normalizer::TextUnit;
use crate::errors::AttemptFailure;

/// How often and how patiently a chunk is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per chunk before it is split
    pub max_retries: u32,
    /// Fixed pause before each retry
    pub pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            pause: Duration::from_millis(1500),
        }
    }
}

/// A contiguous run of fragments, relative to the batch the engine was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
    /// Number of splits that led to this chunk
    pub depth: usize,
}

impl Chunk {
    /// The chunk covering a whole batch of `len` fragments
    pub fn root(len: usize) -> Self {
        Self { start: 0, end: len, depth: 0 }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Split at `len / 2`; the left half is never larger than the right
    pub fn split(&self) -> (Chunk, Chunk) {
        let mid = self.start + self.len() / 2;
        let depth = self.depth + 1;
        (
            Chunk { start: self.start, end: mid, depth },
            Chunk { start: mid, end: self.end, depth },
        )
    }
}

/// Where a chunk is in its retry lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// About to make attempt number `k` (1-based)
    Attempting(u32),
    /// Out of attempts with more than one fragment
    Splitting,
    /// Out of attempts with exactly one fragment
    Fallback,
    /// Every slot of the chunk is filled or delegated to sub-chunks
    Done,
}

/// Drives chunks through attempts, splits and fallbacks
pub struct AdaptiveRetryEngine<'a> {
    attempt: BatchAttempt<'a>,
    policy: RetryPolicy,
    /// Position of the batch's first fragment in the whole input, for logs
    offset: usize,
}

impl<'a> AdaptiveRetryEngine<'a> {
    pub fn new(attempt: BatchAttempt<'a>, policy: RetryPolicy) -> Self {
        Self { attempt, policy, offset: 0 }
    }

    /// Report fragment positions relative to the whole input, starting at `offset`
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// The chunk's fragments as positions in the whole input
    pub fn absolute(&self, chunk: Chunk) -> Range<usize> {
        chunk.start + self.offset..chunk.end + self.offset
    }

    /// Translate every unit, one output per unit in input order
    ///
    /// Returns `None` only if some slot could not be filled at all, which
    /// the fallback rule makes unreachable in practice.
    pub async fn run(&self, units: &[TextUnit], stats: &mut TranslationStats) -> Option<Vec<String>> {
        let mut slots: Vec<Option<String>> = vec![None; units.len()];
        let mut pending = vec![Chunk::root(units.len())];

        while let Some(chunk) = pending.pop() {
            if chunk.is_empty() {
                continue;
            }

            let mut state = ChunkState::Attempting(1);
            loop {
                state = match state {
                    ChunkState::Attempting(k) => self.attempt_chunk(units, chunk, k, &mut slots, stats).await,

                    ChunkState::Splitting => {
                        let (left, right) = chunk.split();
                        info!(
                            "Splitting chunk of {} into {} + {} (depth {})",
                            chunk.len(), left.len(), right.len(), left.depth
                        );
                        stats.splits += 1;
                        pending.push(right);
                        pending.push(left);
                        ChunkState::Done
                    }

                    ChunkState::Fallback => {
                        warn!(
                            "Giving up on fragment {}; keeping original text",
                            self.absolute(chunk).start
                        );
                        stats.fallbacks += 1;
                        slots[chunk.start] = Some(units[chunk.start].original().to_string());
                        ChunkState::Done
                    }

                    ChunkState::Done => break,
                };
            }
        }

        slots.into_iter().collect()
    }

    async fn attempt_chunk(
        &self,
        units: &[TextUnit],
        chunk: Chunk,
        k: u32,
        slots: &mut [Option<String>],
        stats: &mut TranslationStats,
    ) -> ChunkState {
        info!(
            "Translating chunk of size {} (attempt {}/{})",
            chunk.len(), k, self.policy.max_retries
        );
        stats.requests += 1;

        match self.attempt.run(&units[chunk.range()]).await {
            Ok(translations) => {
                for (slot, translation) in slots[chunk.range()].iter_mut().zip(translations) {
                    *slot = Some(translation);
                }
                stats.translated += chunk.len();
                ChunkState::Done
            }
            Err(failure) => {
                match &failure {
                    AttemptFailure::Service(e) => {
                        let range = self.absolute(chunk);
                        error!("Service error on fragments {}-{}: {}", range.start, range.end, e);
                        stats.service_errors += 1;
                    }
                    mismatch => {
                        let range = self.absolute(chunk);
                        warn!("{} (fragments {}-{})", mismatch, range.start, range.end);
                        stats.mismatches += 1;
                    }
                }

                if k < self.policy.max_retries {
                    stats.retries += 1;
                    if !self.policy.pause.is_zero() {
                        tokio::time::sleep(self.policy.pause).await;
                    }
                    ChunkState::Attempting(k + 1)
                } else if chunk.len() > 1 {
                    ChunkState::Splitting
                } else {
                    ChunkState::Fallback
                }
            }
        }
    }
}
