/*!
 * Error types for the pagebabel application.
 *
 * This module contains custom error types for the different layers of the
 * translation pipeline, using the thiserror crate for ergonomic error definitions.
 *
 * - `ProviderError`: a single call to the text-generation service failed
 * - `AttemptFailure`: one batch attempt produced no usable translation list
 * - `TranslationError`: a whole request failed and nothing may be returned
 * - `AppError`: everything the binary can surface to the user
 */

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to a text-generation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The call did not complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Why a single batch attempt did not yield a usable translation list.
///
/// None of these escape the retry engine; they drive its retry/split decisions.
#[derive(Error, Debug)]
pub enum AttemptFailure {
    /// The provider call itself failed
    #[error("Service error: {0}")]
    Service(#[from] ProviderError),

    /// The response contained no line in the `III >>> text` format at all
    #[error("Response contained no parsable lines (expected {expected})")]
    FormatMismatch { expected: usize },

    /// The response contained the wrong number of lines
    #[error("Mismatch: expected {expected} but got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Errors that fail a whole translation request
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A top-level batch produced no complete result
    #[error("Could not translate batch {start}-{end}")]
    TotalBatchFailure { start: usize, end: usize },

    /// A single-item response did not carry the `Translation:` label
    #[error("Response is missing the 'Translation:' label: {0}")]
    MissingLabel(String),

    /// Translated and original collections differ in length
    #[error("Mismatch between translated and original text count: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
