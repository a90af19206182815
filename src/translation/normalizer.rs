/*!
 * Fragment normalization.
 *
 * A fragment is prompted as exactly one line, so line breaks are folded into
 * spaces, surrounding whitespace is dropped, and long fragments are cut.
 */

use super::prompts::LINE_BREAKS;

/// Appended to a fragment that was cut at the length limit
pub const TRUNCATION_MARKER: &str = "...";

/// Default maximum fragment length, in characters
pub const DEFAULT_MAX_CHARS: usize = 300;

/// A caller-supplied fragment together with its prompt-ready form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    original: String,
    normalized: String,
}

impl TextUnit {
    /// Build a unit, normalizing `original` to at most `max_chars` characters
    pub fn new(original: impl Into<String>, max_chars: usize) -> Self {
        let original = original.into();
        let normalized = normalize(&original, max_chars);
        Self { original, normalized }
    }

    /// Build one unit per fragment, preserving order
    pub fn from_fragments<S: AsRef<str>>(fragments: &[S], max_chars: usize) -> Vec<Self> {
        fragments.iter()
            .map(|f| Self::new(f.as_ref(), max_chars))
            .collect()
    }

    /// The text exactly as supplied
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The single-line, length-bounded text sent in prompts
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Fold line breaks into spaces, trim, and cut to `max_chars` characters
///
/// `\r\n` and every other line break each become one space. Length is counted in `char`s;
/// a cut fragment keeps its first `max_chars` characters followed by
/// [`TRUNCATION_MARKER`].
pub fn normalize(raw: &str, max_chars: usize) -> String {
    let single_line = raw.replace("\r\n", " ").replace(LINE_BREAKS, " ");
    let trimmed = single_line.trim();

    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &trimmed[..cut], TRUNCATION_MARKER),
        None => trimmed.to_string(),
    }
}
