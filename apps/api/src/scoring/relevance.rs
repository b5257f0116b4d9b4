//! Relevance: how directly the answer addresses the question.
//!
//! Primary: cosine similarity of question/answer embeddings, rescaled to 0–100.
//! Fallback: Jaccard overlap of stopword-free content tokens.
//! Both paths add a flat bonus when the answer carries indicator words for the
//! detected question type.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::backends::{cosine_similarity, BackendError, EmbeddingBackend};
use crate::scoring::types::{details, round4, MetricScore, MAX_SCORE};
use crate::text::{jaccard, tokenize_and_filter};

pub const RELEVANCE_WEIGHT: f64 = 0.35;
/// Flat bonus for matching the question type's indicator words.
pub const QUESTION_TYPE_BONUS: f64 = 10.0;
/// Base score when the question has no content tokens to compare against.
pub const NEUTRAL_RELEVANCE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    What,
    How,
    Why,
    When,
    Where,
    Who,
    Request,
    YesNo,
    Describe,
    Explain,
    General,
}

impl QuestionType {
    /// Classifies by the leading word or phrase of the lowercased question.
    pub fn detect(question: &str) -> Self {
        let q = question.trim().to_lowercase();
        let starts = |prefixes: &[&str]| prefixes.iter().any(|p| q.starts_with(p));

        if starts(&["what"]) {
            QuestionType::What
        } else if starts(&["how"]) {
            QuestionType::How
        } else if starts(&["why"]) {
            QuestionType::Why
        } else if starts(&["when"]) {
            QuestionType::When
        } else if starts(&["where"]) {
            QuestionType::Where
        } else if starts(&["who"]) {
            QuestionType::Who
        } else if starts(&["can you", "could you", "would you"]) {
            QuestionType::Request
        } else if starts(&["is ", "are ", "do ", "does ", "did "]) {
            QuestionType::YesNo
        } else if starts(&["describe"]) {
            QuestionType::Describe
        } else if starts(&["explain"]) {
            QuestionType::Explain
        } else {
            QuestionType::General
        }
    }

    /// Words whose presence suggests the answer has the expected shape.
    /// `None` means the type has no indicator set and always counts as addressed.
    pub fn indicators(self) -> Option<&'static [&'static str]> {
        match self {
            QuestionType::What => Some(&["is", "are", "means", "refers to", "defined as"]),
            QuestionType::How => Some(&["by", "through", "using", "first", "then", "steps", "process"]),
            QuestionType::Why => Some(&["because", "since", "reason", "due to", "as a result", "therefore"]),
            QuestionType::When => Some(&["when", "during", "after", "before", "while", "time"]),
            QuestionType::Describe => Some(&["is", "has", "contains", "includes", "features"]),
            QuestionType::Explain => Some(&["means", "works", "because", "therefore", "process"]),
            QuestionType::YesNo => Some(&["yes", "no", "definitely", "absolutely", "not really"]),
            QuestionType::Where
            | QuestionType::Who
            | QuestionType::Request
            | QuestionType::General => None,
        }
    }

    /// Case-insensitive substring check of the indicator words against `answer`.
    pub fn answered_by(self, answer: &str) -> bool {
        let answer_lower = answer.to_lowercase();
        match self.indicators() {
            Some(words) => words.iter().any(|w| answer_lower.contains(w)),
            None => true,
        }
    }
}

/// Raw keyword-overlap measurement behind the fallback path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub base_score: f64,
    pub overlap_count: usize,
    pub jaccard: f64,
}

/// Jaccard overlap of content tokens, as a 0–100 base score. A question with
/// no content tokens scores `NEUTRAL_RELEVANCE`.
pub fn keyword_overlap(question: &str, answer: &str) -> Overlap {
    let question_tokens = tokenize_and_filter(question);
    let answer_tokens = tokenize_and_filter(answer);
    let overlap_count = question_tokens.intersection(&answer_tokens).count();

    if question_tokens.is_empty() {
        return Overlap {
            base_score: NEUTRAL_RELEVANCE,
            overlap_count,
            jaccard: 0.0,
        };
    }

    let similarity = jaccard(&question_tokens, &answer_tokens);
    Overlap {
        base_score: similarity * MAX_SCORE,
        overlap_count,
        jaccard: similarity,
    }
}

/// Maps a cosine similarity in [-1, 1] onto [0, 100].
pub fn similarity_to_score(similarity: f64) -> f64 {
    ((similarity + 1.0) / 2.0 * MAX_SCORE).max(0.0)
}

#[derive(Clone)]
pub struct RelevanceEvaluator {
    embedder: Option<Arc<dyn EmbeddingBackend>>,
    weight: f64,
}

impl RelevanceEvaluator {
    pub fn new(embedder: Option<Arc<dyn EmbeddingBackend>>, weight: f64) -> Self {
        Self { embedder, weight }
    }

    /// `context` is accepted for callers that carry one (role, topic) and is
    /// recorded in the details; it does not change the score.
    pub async fn evaluate(&self, question: &str, answer: &str, context: Option<&str>) -> MetricScore {
        let mut info = details(json!({}));

        let semantic = match &self.embedder {
            Some(embedder) => match semantic_similarity(embedder.as_ref(), question, answer).await {
                Ok(similarity) => Some((embedder.name().to_string(), similarity)),
                Err(e) => {
                    warn!("Embedding backend failed, using keyword overlap: {e}");
                    info.insert("backend_error".into(), json!(e.to_string()));
                    None
                }
            },
            None => None,
        };

        let base_score = match semantic {
            Some((backend, similarity)) => {
                info.insert("method".into(), json!("semantic_similarity"));
                info.insert("backend".into(), json!(backend));
                info.insert("cosine_similarity".into(), json!(round4(similarity)));
                similarity_to_score(similarity)
            }
            None => {
                let overlap = keyword_overlap(question, answer);
                info.insert("method".into(), json!("keyword_overlap"));
                info.insert("overlap_count".into(), json!(overlap.overlap_count));
                info.insert("jaccard".into(), json!(round4(overlap.jaccard)));
                overlap.base_score
            }
        };

        let question_type = QuestionType::detect(question);
        let addresses_type = question_type.answered_by(answer);
        let bonus = if addresses_type { QUESTION_TYPE_BONUS } else { 0.0 };
        let final_score = (base_score + bonus).min(MAX_SCORE);

        info.insert("question_type".into(), json!(question_type));
        info.insert("addresses_question_type".into(), json!(addresses_type));
        info.insert("type_bonus".into(), json!(bonus));
        info.insert(
            "context_provided".into(),
            json!(context.is_some_and(|c| !c.trim().is_empty())),
        );

        MetricScore::new(final_score, self.weight, relevance_feedback(final_score), info)
    }
}

async fn semantic_similarity(
    embedder: &dyn EmbeddingBackend,
    question: &str,
    answer: &str,
) -> Result<f64, BackendError> {
    let (q, a) = tokio::try_join!(embedder.embed(question), embedder.embed(answer))?;
    cosine_similarity(&q, &a)
}

fn relevance_feedback(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent! Your answer directly addresses the question."
    } else if score >= 60.0 {
        "Good relevance. Consider focusing more on the specific question asked."
    } else if score >= 40.0 {
        "Partial relevance. Some points don't directly answer the question."
    } else {
        "Low relevance. Please re-read the question and address it directly."
    }
}
