/*!
 * Batch translation processing.
 *
 * Fragments are cut into top-level batches of `batch_size`. Each batch goes
 * through its own adaptive retry engine; up to `concurrent_batches` batches
 * run at once and results are put back together by batch index.
 */

use futures::stream::{self, StreamExt};
use log::{error, info};
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use super::core::{TranslationService, TranslationStats};
use super::normalizer::TextUnit;
use crate::errors::TranslationError;

/// Split `len` fragments into consecutive ranges of at most `batch_size`
pub fn plan_batches(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    let batch_size = batch_size.max(1);
    (0..len)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(len))
        .collect()
}

/// Batch translator for processing fragments in batches
pub struct BatchTranslator {
    /// The translation service to use
    service: TranslationService,

    /// Fragments per top-level batch
    batch_size: usize,

    /// Maximum number of batches in flight
    concurrent_batches: usize,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(service: TranslationService) -> Self {
        Self {
            batch_size: service.options.batch_size.max(1),
            concurrent_batches: service.options.concurrent_batches.max(1),
            service,
        }
    }

    /// Translate raw fragments; see [`BatchTranslator::translate_units`]
    pub async fn translate_fragments<S: AsRef<str>>(
        &self,
        fragments: &[S],
        target_language: &str,
        progress_callback: impl Fn(usize, usize) + Send + Sync,
    ) -> Result<(Vec<String>, TranslationStats), TranslationError> {
        let units = TextUnit::from_fragments(fragments, self.service.options.max_fragment_chars);
        self.translate_units(&units, target_language, progress_callback).await
    }

    /// Translate units batch by batch
    ///
    /// The output has one string per unit, in input order. If any batch
    /// cannot be completed the whole call fails and no partial output is
    /// returned. `progress_callback` receives `(batches_done, total_batches)`.
    pub async fn translate_units(
        &self,
        units: &[TextUnit],
        target_language: &str,
        progress_callback: impl Fn(usize, usize) + Send + Sync,
    ) -> Result<(Vec<String>, TranslationStats), TranslationError> {
        let mut total_stats = TranslationStats::new();
        if units.is_empty() {
            return Ok((Vec::new(), total_stats));
        }

        let batches = plan_batches(units.len(), self.batch_size);
        let total_batches = batches.len();
        let processed_batches = AtomicUsize::new(0);
        info!(
            "Translating {} fragments in {} batch(es) into {}",
            units.len(), total_batches, target_language
        );

        let service = &self.service;
        let processed_batches = &processed_batches;
        let progress_callback = &progress_callback;

        let mut results = stream::iter(batches.into_iter().enumerate())
            .map(|(batch_index, range)| async move {
                let start_time = Instant::now();
                let mut stats = TranslationStats::new();
                let translations = service
                    .engine(target_language)
                    .with_offset(range.start)
                    .run(&units[range.clone()], &mut stats)
                    .await;

                let current = processed_batches.fetch_add(1, Ordering::SeqCst) + 1;
                progress_callback(current, total_batches);
                info!(
                    "Batch {}/{} done in {:?}",
                    batch_index + 1, total_batches, start_time.elapsed()
                );

                (batch_index, range, translations, stats)
            })
            .buffer_unordered(self.concurrent_batches)
            .collect::<Vec<_>>()
            .await;

        // Sort results by batch index to maintain original order
        results.sort_by_key(|(batch_index, ..)| *batch_index);

        let mut output = Vec::with_capacity(units.len());
        for (_, range, translations, stats) in results {
            total_stats.merge(&stats);
            match translations {
                Some(translations) if translations.len() == range.len() => output.extend(translations),
                _ => {
                    error!("Could not translate batch {}-{}", range.start, range.end);
                    return Err(TranslationError::TotalBatchFailure {
                        start: range.start,
                        end: range.end,
                    });
                }
            }
        }

        if output.len() != units.len() {
            return Err(TranslationError::LengthMismatch {
                expected: units.len(),
                actual: output.len(),
            });
        }

        Ok((output, total_stats))
    }
}
