use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{self, FragmentFilter, TextNode};
use crate::errors::TranslationError;

// @module: Input and output files of the translate command

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @generates: Output path next to the input, tagged with the language
    // @params: input_file, target_language
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, target_language: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let language: String = target_language
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();

        let file_name = match input_file.extension() {
            Some(ext) => format!("{}.{}.{}", stem, language, ext.to_string_lossy()),
            None => format!("{}.{}", stem, language),
        };
        input_file.with_file_name(file_name)
    }

    // @reads: Whole file as UTF-8
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    // @writes: Content to file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
    }
}

// @enum: Fragments loaded from an input file, kept in their original shape
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentDocument {
    /// Plain text, one fragment per line
    Lines(Vec<String>),
    /// JSON array of strings
    Texts(Vec<String>),
    /// JSON array of `{parent_tag, text}` nodes
    Nodes(Vec<TextNode>),
}

impl FragmentDocument {
    // @parses: JSON array of strings or nodes, otherwise plain lines
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim_start().starts_with('[') {
            if let Ok(texts) = serde_json::from_str::<Vec<String>>(content) {
                return Ok(Self::Texts(texts));
            }
            match serde_json::from_str::<Vec<TextNode>>(content) {
                Ok(nodes) => return Ok(Self::Nodes(nodes)),
                // Text that only opens with `[` falls through to plain lines
                Err(e) if serde_json::from_str::<serde_json::Value>(content).is_ok_and(|v| v.is_array()) => {
                    return Err(anyhow!("Input is a JSON array but not of strings or text nodes: {}", e));
                }
                Err(_) => {}
            }
        }

        Ok(Self::Lines(content.lines().map(str::to_string).collect()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::parse(&FileManager::read_to_string(path)?)
            .with_context(|| format!("Failed to parse input file: {}", path.display()))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Lines(items) | Self::Texts(items) => items.len(),
            Self::Nodes(nodes) => nodes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // @selects: Indices worth translating; blank lines and strings are kept as is
    pub fn select(&self, filter: &FragmentFilter) -> Vec<usize> {
        match self {
            Self::Lines(items) | Self::Texts(items) => items.iter()
                .enumerate()
                .filter(|(_, text)| !text.trim().is_empty())
                .map(|(i, _)| i)
                .collect(),
            Self::Nodes(nodes) => filter.select(nodes),
        }
    }

    // @returns: Source texts of the selected items
    pub fn originals(&self, indices: &[usize]) -> Vec<String> {
        match self {
            Self::Lines(items) | Self::Texts(items) => indices.iter()
                .filter_map(|&i| items.get(i).cloned())
                .collect(),
            Self::Nodes(nodes) => document::originals(nodes, indices),
        }
    }

    // @replaces: Selected items with their translations, all or nothing
    pub fn splice(&mut self, indices: &[usize], translations: &[String]) -> Result<(), TranslationError> {
        match self {
            Self::Lines(items) | Self::Texts(items) => {
                if translations.len() != indices.len() || indices.iter().any(|&i| i >= items.len()) {
                    return Err(TranslationError::LengthMismatch {
                        expected: indices.len(),
                        actual: translations.len(),
                    });
                }
                for (&i, translation) in indices.iter().zip(translations) {
                    items[i] = translation.clone();
                }
                Ok(())
            }
            Self::Nodes(nodes) => document::splice(nodes, indices, translations),
        }
    }

    // @renders: Same shape as the input
    pub fn render(&self) -> Result<String> {
        match self {
            Self::Lines(items) => {
                let mut content = items.join("\n");
                content.push('\n');
                Ok(content)
            }
            Self::Texts(items) => Ok(serde_json::to_string_pretty(items)?),
            Self::Nodes(nodes) => Ok(serde_json::to_string_pretty(nodes)?),
        }
    }
}
