//! The model seam: everything the note pipeline asks of a language model.
//!
//! Inference itself happens in an external runtime. [`NoteModel`] hides which
//! runtime answers; [`EchoModel`] answers in-process for offline use.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to load model: {0}")]
    LoadFailed(String),

    #[error("Inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Inference runtime returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Inference runtime returned no choices")]
    EmptyResponse,

    #[error("Model worker is not running")]
    WorkerGone,
}

/// Prefix the summarization prompt carries, as seq2seq summarizers expect.
pub const SUMMARIZE_PREFIX: &str = "summarize: ";

/// A pretrained language model able to continue and summarize text.
#[async_trait]
pub trait NoteModel: Send + Sync {
    /// Identifier reported in logs and health output.
    fn name(&self) -> &str;

    /// Continue `text`. The returned string starts with the prompt, like a
    /// decoder-only model's decoded output.
    async fn generate(&self, text: &str) -> Result<String, ModelError>;

    /// Produce a short summary of `text`.
    async fn summarize(&self, text: &str) -> Result<String, ModelError>;

    /// Check the model is reachable and loaded.
    async fn check_ready(&self) -> Result<(), ModelError> {
        Ok(())
    }
}

/// Deterministic in-process model.
///
/// `generate` returns the prompt unchanged. `summarize` keeps leading
/// sentences while they fit in `max_chars`.
#[derive(Debug, Clone)]
pub struct EchoModel {
    max_chars: usize,
}

impl EchoModel {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

#[async_trait]
impl NoteModel for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    async fn generate(&self, text: &str) -> Result<String, ModelError> {
        Ok(text.to_string())
    }

    async fn summarize(&self, text: &str) -> Result<String, ModelError> {
        let mut summary = String::new();
        for sentence in text.split('.').map(str::trim).filter(|s| !s.is_empty()) {
            let next_len = summary.chars().count() + sentence.chars().count() + 2;
            if !summary.is_empty() && next_len > self.max_chars {
                break;
            }
            if !summary.is_empty() {
                summary.push(' ');
            }
            summary.push_str(sentence);
            summary.push('.');
        }
        Ok(truncate_chars(&summary, self.max_chars).to_string())
    }
}

/// Cut `text` to at most `max` chars without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
