//! Keyword coverage: fraction of expected keywords present in the answer.

use std::sync::Arc;

use serde_json::json;

use crate::backends::Lemmatizer;
use crate::scoring::types::{details, round2, MetricScore, MAX_SCORE};
use crate::text::{tokenize_and_filter, tokenize_simple};

pub const KEYWORDS_WEIGHT: f64 = 0.20;
/// Score given when the caller expects no keywords at all.
pub const NO_KEYWORDS_SCORE: f64 = 75.0;
pub const MAX_EXTRACTED_KEYWORDS: usize = 10;

const QUESTION_WORDS: &[&str] = &[
    "what", "how", "why", "when", "where", "who", "explain", "describe", "tell", "give", "example",
];

/// Content tokens of the question, minus interrogative and instructional
/// words, in alphabetical order and capped at `MAX_EXTRACTED_KEYWORDS`.
pub fn extract_keywords_from_question(question: &str) -> Vec<String> {
    tokenize_and_filter(question)
        .into_iter()
        .filter(|t| !QUESTION_WORDS.contains(&t.as_str()))
        .take(MAX_EXTRACTED_KEYWORDS)
        .collect()
}

#[derive(Clone)]
pub struct KeywordEvaluator {
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
    weight: f64,
}

impl KeywordEvaluator {
    pub fn new(lemmatizer: Option<Arc<dyn Lemmatizer>>, weight: f64) -> Self {
        Self { lemmatizer, weight }
    }

    pub fn has_lemmatizer(&self) -> bool {
        self.lemmatizer.is_some()
    }

    /// Lemmas of each answer token, in order.
    fn answer_lemmas(&self, answer: &str) -> Option<Vec<String>> {
        let lemmatizer = self.lemmatizer.as_ref()?;
        Some(
            tokenize_simple(answer)
                .iter()
                .map(|t| lemmatizer.lemmatize(t))
                .collect(),
        )
    }

    /// Substring match first; failing that, the keyword's word lemmas must
    /// appear as consecutive answer-token lemmas.
    fn is_present(
        &self,
        keyword: &str,
        answer_lower: &str,
        answer_lemmas: Option<&[String]>,
    ) -> bool {
        let keyword_lower = keyword.to_lowercase();
        if answer_lower.contains(&keyword_lower) {
            return true;
        }
        let (Some(lemmatizer), Some(answer_lemmas)) = (&self.lemmatizer, answer_lemmas) else {
            return false;
        };
        let keyword_lemmas: Vec<String> = tokenize_simple(&keyword_lower)
            .iter()
            .map(|w| lemmatizer.lemmatize(w))
            .collect();
        !keyword_lemmas.is_empty()
            && answer_lemmas
                .windows(keyword_lemmas.len())
                .any(|window| window == keyword_lemmas.as_slice())
    }

    pub fn evaluate(&self, answer: &str, expected_keywords: &[String]) -> MetricScore {
        let expected: Vec<&str> = expected_keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();

        if expected.is_empty() {
            return MetricScore::new(
                NO_KEYWORDS_SCORE,
                self.weight,
                "No specific keywords were expected for this question.",
                details(json!({ "expected": [], "found": [], "missing": [] })),
            );
        }

        let answer_lower = answer.to_lowercase();
        let answer_lemmas = self.answer_lemmas(answer);
        let (found, missing): (Vec<&str>, Vec<&str>) = expected
            .iter()
            .copied()
            .partition(|k| self.is_present(k, &answer_lower, answer_lemmas.as_deref()));

        let coverage = found.len() as f64 / expected.len() as f64 * MAX_SCORE;
        let feedback = keyword_feedback(coverage, &missing);

        let info = details(json!({
            "expected": expected,
            "found": found,
            "missing": missing,
            "coverage_percentage": round2(coverage),
            "lemmatized": self.has_lemmatizer(),
        }));

        MetricScore::new(coverage, self.weight, feedback, info)
    }
}

fn keyword_feedback(score: f64, missing: &[&str]) -> String {
    let first = |n: usize| missing.iter().take(n).copied().collect::<Vec<_>>().join(", ");

    if score >= 80.0 {
        "Excellent! You've covered most key technical terms.".to_string()
    } else if score >= 60.0 {
        format!("Good keyword usage. Consider mentioning: {}", first(3))
    } else if score >= 40.0 {
        format!("Some key terms missing. Include: {}", first(5))
    } else {
        format!("Most expected keywords missing. Review: {}", first(5))
    }
}
