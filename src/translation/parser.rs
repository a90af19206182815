/*!
 * Response parsing.
 *
 * The service is asked for one `III >>> text` line per fragment. Parsing is
 * deliberately loose: any line carrying the marker counts, anything else is
 * treated as commentary and skipped. Whether the count is right is for the
 * caller to judge.
 */

use super::prompts::{LINE_BREAKS, LINE_MARKER, LINE_PREFIX_LEN, SINGLE_LABEL};
use crate::errors::TranslationError;

/// Extract the translated strings from a batch response, in line order
///
/// The numeric index is not consulted; it only helps the model keep count.
/// A marker line shorter than the fixed prefix yields an empty string.
pub fn parse_batch_response(raw: &str) -> Vec<String> {
    raw.trim()
        .split(LINE_BREAKS)
        .filter(|line| line.contains(LINE_MARKER))
        .map(|line| line.chars().skip(LINE_PREFIX_LEN).collect::<String>().trim().to_string())
        .collect()
}

/// Extract the translation from a single-item response
///
/// Everything after the `Translation:` label, trimmed, is the translation.
pub fn extract_labeled_translation(raw: &str) -> Result<String, TranslationError> {
    let response = raw.trim();
    match response.find(SINGLE_LABEL) {
        Some(position) => Ok(response[position + SINGLE_LABEL.len()..].trim().to_string()),
        None => Err(TranslationError::MissingLabel(response.chars().take(200).collect())),
    }
}
