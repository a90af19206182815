/*!
 * Mock provider implementations for testing.
 *
 * The mock reads the prompts produced by `translation::prompts` and answers
 * them the way a well-behaved (or badly-behaved) model would:
 * - `MockProvider::working()` - Always answers every numbered line
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::intermittent(n)` - Fails every nth request
 * - `MockProvider::dropping_line()` - Answers one line short
 * - `MockProvider::poisoned(text)` - Refuses any request containing `text`
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::translation::prompts::{format_response_line, ITEMS_HEADER, SINGLE_LABEL};

static ITEM_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\. (.*)$").expect("valid regex"));
static BATCH_LANGUAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"into "([^"\n]*)""#).expect("valid regex"));
static SINGLE_REQUEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^.*\nLanguage: ([^\n]*)\nText: (.*)$").expect("valid regex"));

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Succeeds but wraps the answer in chatty commentary lines
    Commentary,
    /// Answers every item except the last one
    DropLine,
    /// Answers with text that has no `>>>` line at all
    Garbage,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Refuses any request whose items contain the needle
    Poisoned { needle: &'static str },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// One parsed prompt: target language and the numbered items
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    /// Language requested by the prompt
    pub target_language: String,
    /// Items to translate, in prompt order
    pub items: Vec<String>,
    /// Whether the prompt used the single-item `Translation:` contract
    pub single: bool,
}

impl MockRequest {
    /// Recover the language and items from a prompt
    pub fn parse(prompt: &str) -> Self {
        if let Some(items_start) = prompt.find(ITEMS_HEADER) {
            let target_language = BATCH_LANGUAGE.captures(prompt)
                .map(|c| c[1].to_string())
                .unwrap_or_default();
            let items = prompt[items_start + ITEMS_HEADER.len()..]
                .lines()
                .filter_map(|line| ITEM_LINE.captures(line.trim_start()).map(|c| c[2].to_string()))
                .collect();
            return Self { target_language, items, single: false };
        }

        match SINGLE_REQUEST.captures(prompt) {
            Some(c) => Self {
                target_language: c[1].to_string(),
                items: vec![c[2].to_string()],
                single: true,
            },
            None => Self {
                target_language: String::new(),
                items: Vec::new(),
                single: true,
            },
        }
    }
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every prompt received, in order
    prompts: Arc<Mutex<Vec<String>>>,
    /// Custom translation of one item (optional)
    custom_translation: Option<fn(&str, &str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
            custom_translation: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a mock that answers one line short
    pub fn dropping_line() -> Self {
        Self::new(MockBehavior::DropLine)
    }

    /// Create a mock that refuses any request containing `needle`
    pub fn poisoned(needle: &'static str) -> Self {
        Self::new(MockBehavior::Poisoned { needle })
    }

    /// Set a custom translation for each item: `(text, language) -> translation`
    pub fn with_custom_translation(mut self, translate: fn(&str, &str) -> String) -> Self {
        self.custom_translation = Some(translate);
        self
    }

    /// Number of `complete` calls so far, including failed ones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every prompt received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// The translation the working mock gives for one item
    pub fn translate_item(&self, text: &str, language: &str) -> String {
        match self.custom_translation {
            Some(translate) => translate(text, language),
            None => format!("[{}] {}", language, text),
        }
    }

    /// Generate a properly formatted answer for a parsed request
    pub fn generate_response(&self, request: &MockRequest) -> String {
        if request.single {
            let text = request.items.first().map(String::as_str).unwrap_or_default();
            return format!("{}\n{}", SINGLE_LABEL, self.translate_item(text, &request.target_language));
        }

        request.items.iter()
            .enumerate()
            .map(|(i, item)| format_response_line(i + 1, &self.translate_item(item, &request.target_language)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            prompts: Arc::clone(&self.prompts),
            custom_translation: self.custom_translation,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        let request = MockRequest::parse(prompt);

        match self.behavior {
            MockBehavior::Working => Ok(self.generate_response(&request)),

            MockBehavior::Commentary => Ok(format!(
                "Sure! Here are your translations:\n{}\nHope you enjoy them!",
                self.generate_response(&request)
            )),

            MockBehavior::DropLine => {
                let mut lines: Vec<String> = self.generate_response(&request)
                    .lines()
                    .map(str::to_string)
                    .collect();
                lines.pop();
                Ok(lines.join("\n"))
            }

            MockBehavior::Garbage => Ok("I'm sorry, I can't help with that.".to_string()),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.generate_response(&request))
                }
            }

            MockBehavior::Poisoned { needle } => {
                if request.items.iter().any(|item| item.contains(needle)) {
                    Err(ProviderError::ApiError {
                        message: "Simulated refusal".to_string(),
                        status_code: 400,
                    })
                } else {
                    Ok(self.generate_response(&request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.generate_response(&request))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated outage".to_string())),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
