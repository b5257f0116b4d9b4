//! Optional NLP backends consumed by the metric evaluators.
//!
//! Every backend is a capability the evaluators hold as `Option<Arc<dyn ...>>`.
//! Absence, or an error at call time, sends the evaluator down its deterministic
//! fallback path; a `BackendError` never leaves the scoring engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod embeddings;
pub mod language_tool;
pub mod lemmatizer;

pub use embeddings::HttpEmbeddingClient;
pub use language_tool::LanguageToolClient;
pub use lemmatizer::StemmerLemmatizer;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("backend returned an empty response")]
    EmptyResponse,

    #[error("embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
}

/// A single issue reported by a grammar-checking backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarMatch {
    pub rule_id: String,
    pub message: String,
    pub context: String,
    pub replacements: Vec<String>,
}

/// Semantic-similarity backend: embeds text into a fixed-length vector.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, BackendError>;

    /// Short identifier recorded in metric details.
    fn name(&self) -> &str;
}

/// Grammar-checking backend.
#[async_trait]
pub trait GrammarBackend: Send + Sync {
    async fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, BackendError>;

    fn name(&self) -> &str;
}

/// Reduces a word to a base form used for a second keyword-matching attempt.
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str) -> String;
}

/// Cosine similarity in [-1, 1]. Zero-norm vectors yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, BackendError> {
    if a.len() != b.len() {
        return Err(BackendError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}
