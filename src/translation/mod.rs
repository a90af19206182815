/*!
 * Batch translation pipeline.
 *
 * - `normalizer`: Single-line, length-bounded fragment text
 * - `prompts`: Prompt wording and the response line format
 * - `parser`: Extraction of translations from raw responses
 * - `attempt`: One request/response cycle for a chunk
 * - `engine`: Retry, split and fallback for one batch
 * - `batch`: Batch planning, concurrency and reassembly
 * - `concurrency`: Rate limiting of provider calls
 * - `core`: The translation service tying it together
 */

// Re-export main types for easier usage
pub use self::batch::BatchTranslator;
pub use self::core::{TranslationOptions, TranslationService, TranslationStats};
pub use self::engine::{AdaptiveRetryEngine, RetryPolicy};
pub use self::normalizer::TextUnit;

// Submodules
pub mod attempt;
pub mod batch;
pub mod concurrency;
pub mod core;
pub mod engine;
pub mod normalizer;
pub mod parser;
pub mod prompts;
