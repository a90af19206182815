/*!
 * Text nodes of a scraped page.
 *
 * Pages are reduced to a flat list of text nodes. The filter picks the nodes
 * worth translating, and `splice` writes translations back by position.
 */

use serde::{Deserialize, Serialize};

use crate::errors::TranslationError;

/// Parent tags whose text is never shown as page copy
pub const DEFAULT_SKIP_TAGS: &[&str] = &["script", "style", "meta", "noscript", "head", "title", "iframe"];

/// Words that mark tracking or SEO snippets
pub const DEFAULT_SKIP_WORDS: &[&str] = &["yoast", "gtag", "analytics", "pixel", "robots", "snippet"];

/// One text node and the tag that contains it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    /// Lower-case name of the enclosing element
    pub parent_tag: String,
    pub text: String,
}

impl TextNode {
    pub fn new(parent_tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            parent_tag: parent_tag.into(),
            text: text.into(),
        }
    }
}

/// Decides which nodes are translatable
#[derive(Debug, Clone)]
pub struct FragmentFilter {
    skip_tags: Vec<String>,
    skip_words: Vec<String>,
}

impl Default for FragmentFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_TAGS, DEFAULT_SKIP_WORDS)
    }
}

impl FragmentFilter {
    pub fn new<S: AsRef<str>>(skip_tags: &[S], skip_words: &[S]) -> Self {
        Self {
            skip_tags: skip_tags.iter().map(|t| t.as_ref().to_lowercase()).collect(),
            skip_words: skip_words.iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Whether a node holds visible copy worth translating
    pub fn accepts(&self, node: &TextNode) -> bool {
        let text = node.text.trim();
        if text.is_empty() {
            return false;
        }

        let tag = node.parent_tag.to_lowercase();
        if self.skip_tags.iter().any(|t| *t == tag) {
            return false;
        }

        let lowered = text.to_lowercase();
        !self.skip_words.iter().any(|w| lowered.contains(w.as_str()))
    }

    /// Indices of the translatable nodes, in document order
    pub fn select(&self, nodes: &[TextNode]) -> Vec<usize> {
        nodes.iter()
            .enumerate()
            .filter(|(_, node)| self.accepts(node))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Trimmed texts of the selected nodes
pub fn originals(nodes: &[TextNode], indices: &[usize]) -> Vec<String> {
    indices.iter()
        .filter_map(|&i| nodes.get(i))
        .map(|node| node.text.trim().to_string())
        .collect()
}

/// Replace the text of each selected node with its translation
///
/// The i-th translation goes to the node at `indices[i]`. Nothing is changed
/// unless there is exactly one translation per index.
pub fn splice(nodes: &mut [TextNode], indices: &[usize], translations: &[String]) -> Result<(), TranslationError> {
    if translations.len() != indices.len() {
        return Err(TranslationError::LengthMismatch {
            expected: indices.len(),
            actual: translations.len(),
        });
    }
    if let Some(&out_of_range) = indices.iter().find(|&&i| i >= nodes.len()) {
        return Err(TranslationError::LengthMismatch {
            expected: out_of_range + 1,
            actual: nodes.len(),
        });
    }

    for (&i, translation) in indices.iter().zip(translations) {
        nodes[i].text = translation.clone();
    }
    Ok(())
}
