//! Result types shared by the evaluators, the aggregator and the feedback generator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Evaluator-specific diagnostics. The shape differs per metric, so it stays a loose map.
pub type Details = serde_json::Map<String, Value>;

pub const MAX_SCORE: f64 = 100.0;

/// The four scoring dimensions, in their fixed reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Relevance,
    Grammar,
    Fluency,
    Keywords,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Relevance,
        Metric::Grammar,
        Metric::Fluency,
        Metric::Keywords,
    ];

    /// Human-facing area name used in summaries and improvement areas.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Relevance => "Relevance",
            Metric::Grammar => "Grammar",
            Metric::Fluency => "Fluency",
            Metric::Keywords => "Topic Coverage",
        }
    }
}

/// One evaluator's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    pub score: f64, // 0 – 100, rounded to 2 decimals
    pub max_score: f64,
    pub weight: f64,
    pub feedback: String,
    pub details: Details,
}

impl MetricScore {
    /// Clamps `score` into [0, 100] and rounds it to 2 decimals.
    pub fn new(score: f64, weight: f64, feedback: impl Into<String>, details: Details) -> Self {
        let score = if score.is_nan() { 0.0 } else { score };
        Self {
            score: round2(score.clamp(0.0, MAX_SCORE)),
            max_score: MAX_SCORE,
            weight,
            feedback: feedback.into(),
            details,
        }
    }

    pub fn detail_u64(&self, key: &str) -> Option<u64> {
        self.details.get(key).and_then(Value::as_u64)
    }

    pub fn detail_strings(&self, key: &str) -> Vec<String> {
        self.details
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    pub relevance: MetricScore,
    pub grammar: MetricScore,
    pub fluency: MetricScore,
    pub keywords: MetricScore,
}

impl MetricScores {
    pub fn get(&self, metric: Metric) -> &MetricScore {
        match metric {
            Metric::Relevance => &self.relevance,
            Metric::Grammar => &self.grammar,
            Metric::Fluency => &self.fluency,
            Metric::Keywords => &self.keywords,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &MetricScore)> {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// Aggregate output for one (question, answer) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub question: String,
    pub answer: String,
    pub overall_score: f64,
    pub grade: String,
    pub scores: MetricScores,
    pub suggestions: Vec<String>, // most important first
    pub strengths: Vec<String>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Unwraps a `json!({...})` object literal into a `Details` map.
pub fn details(value: Value) -> Details {
    match value {
        Value::Object(map) => map,
        _ => Details::new(),
    }
}
