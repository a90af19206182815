/*!
 * Tests for the error types
 */

use pagebabel::errors::{AppError, AttemptFailure, ProviderError, TranslationError};
use std::time::Duration;

#[test]
fn test_providerError_display_shouldDescribeFailure() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "overloaded".to_string(),
    };
    assert!(error.to_string().contains("503"));
    assert!(error.to_string().contains("overloaded"));

    let timeout = ProviderError::Timeout(Duration::from_secs(3));
    assert_eq!(timeout.to_string(), "Request timed out after 3s");
}

#[test]
fn test_formatMismatch_display_shouldNameExpectedCount() {
    let failure = AttemptFailure::FormatMismatch { expected: 7 };
    assert!(failure.to_string().contains("expected 7"));
}

#[test]
fn test_translationError_fromProviderError_shouldKeepSource() {
    let error: TranslationError = ProviderError::AuthenticationError("bad key".to_string()).into();
    assert!(matches!(error, TranslationError::Provider(ProviderError::AuthenticationError(_))));
    assert!(error.to_string().contains("bad key"));
}

#[test]
fn test_totalBatchFailure_display_shouldNameRange() {
    let error = TranslationError::TotalBatchFailure { start: 500, end: 1000 };
    assert_eq!(error.to_string(), "Could not translate batch 500-1000");
}

#[test]
fn test_appError_conversions_shouldWrapSourceErrors() {
    let from_translation: AppError = TranslationError::MissingLabel("Hola".to_string()).into();
    assert!(matches!(from_translation, AppError::Translation(_)));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(ref message) if message.contains("gone")));

    let from_anyhow: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(from_anyhow, AppError::Unknown(_)));
}
