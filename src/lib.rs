/*!
 * # PageBabel - playful batch translation of page text
 *
 * A Rust library that sends many short text fragments to a generative
 * language model for translation into any target language, real or not.
 *
 * ## Features
 *
 * - Batch prompts with a strict `001 >>> text` line format
 * - Adaptive retries: a failing batch is retried, then split in half,
 *   down to single fragments that fall back to their original text
 * - Order and length of the input are always preserved
 * - Concurrent batches behind a shared rate limiter
 * - Backends:
 *   - Google Gemini
 *   - Ollama (local LLM)
 *   - A deterministic mock for tests
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The translation pipeline:
 *   - `translation::normalizer`: Fragment normalization
 *   - `translation::prompts`: Prompt construction
 *   - `translation::parser`: Response parsing
 *   - `translation::engine`: Retry, split and fallback
 *   - `translation::batch`: Batch planning and reassembly
 *   - `translation::core`: The translation service
 * - `document`: Selection and splicing of page text nodes
 * - `file_utils`: Input and output files
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for text-generation services:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Mock provider
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(non_snake_case)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use document::{FragmentFilter, TextNode};
pub use file_utils::FragmentDocument;
pub use errors::{AppError, AttemptFailure, ProviderError, TranslationError};
pub use translation::{BatchTranslator, TranslationService, TranslationStats};
