//! Strengths, suggestions and prioritized improvement areas derived from the
//! four metric scores.

use std::cmp::Ordering;

use serde::Serialize;

use crate::scoring::types::{round2, Metric, MetricScores, MAX_SCORE};
use crate::scoring::weights::ScoringWeights;

pub const STRENGTH_THRESHOLD: f64 = 80.0;
pub const SUGGESTION_THRESHOLD: f64 = 70.0;
pub const IMPROVEMENT_TARGET: f64 = 80.0;
/// Weighted gap above which an improvement area is high impact.
pub const HIGH_IMPACT_GAP: f64 = 15.0;
const LOW_SCORE: f64 = 50.0;

pub const GENERIC_ENCOURAGEMENT: &str = "Great job! Keep practicing to maintain this level.";

fn strength_text(metric: Metric) -> &'static str {
    match metric {
        Metric::Relevance => "Excellent question relevance",
        Metric::Grammar => "Strong grammar and spelling",
        Metric::Fluency => "Well-structured and coherent response",
        Metric::Keywords => "Good use of technical terminology",
    }
}

/// One entry per metric scoring at least 80, in metric order.
pub fn identify_strengths(scores: &MetricScores) -> Vec<String> {
    scores
        .iter()
        .filter(|(_, s)| s.score >= STRENGTH_THRESHOLD)
        .map(|(metric, _)| strength_text(metric).to_string())
        .collect()
}

/// Suggestions for metrics under 70, in fixed metric order. Falls back to a
/// single encouragement when nothing triggered.
pub fn generate_suggestions(scores: &MetricScores) -> Vec<String> {
    let mut suggestions = Vec::new();

    if scores.relevance.score < SUGGESTION_THRESHOLD {
        suggestions.push(
            "Read the question carefully and ensure your answer directly addresses it.".to_string(),
        );
    }

    if scores.grammar.score < SUGGESTION_THRESHOLD {
        let errors = scores.grammar.detail_u64("total_errors").unwrap_or(0);
        suggestions.push(format!("Review grammar and spelling - {errors} issues found."));
    }

    if scores.fluency.score < SUGGESTION_THRESHOLD {
        if scores.fluency.detail_u64("word_count").unwrap_or(0) < 50 {
            suggestions.push("Provide a more detailed response with examples.".to_string());
        }
        if scores.fluency.detail_strings("transition_words_found").len() < 2 {
            suggestions.push(
                "Use transition words (however, therefore, for example) to improve flow."
                    .to_string(),
            );
        }
    }

    if scores.keywords.score < SUGGESTION_THRESHOLD {
        let missing = scores.keywords.detail_strings("missing");
        if !missing.is_empty() {
            let top: Vec<&str> = missing.iter().take(3).map(String::as_str).collect();
            suggestions.push(format!("Include key terms: {}", top.join(", ")));
        }
    }

    if suggestions.is_empty() {
        suggestions.push(GENERIC_ENCOURAGEMENT.to_string());
    }
    suggestions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovementArea {
    pub area: &'static str,
    pub metric: Metric,
    pub current_score: f64,
    pub target_score: f64,
    pub impact: Impact,
    pub recommendation: &'static str,
}

fn recommendation(metric: Metric, score: f64) -> &'static str {
    let low = score < LOW_SCORE;
    match (metric, low) {
        (Metric::Relevance, true) => {
            "Focus on directly addressing the question using the STAR method"
        }
        (Metric::Relevance, false) => "Improve focus on key aspects of the question",
        (Metric::Grammar, true) => "Practice with grammar checking tools and review common errors",
        (Metric::Grammar, false) => "Pay attention to sentence structure and tense consistency",
        (Metric::Fluency, true) => "Practice speaking at a measured pace with clear structure",
        (Metric::Fluency, false) => "Work on transitions between ideas and varying sentence length",
        (Metric::Keywords, true) => "Research common topics for your target role and industry",
        (Metric::Keywords, false) => "Include more specific technical terms and industry keywords",
    }
}

/// Metrics under 70, highest weighted gap `(100 − score) × weight` first.
pub fn improvement_areas(scores: &MetricScores, weights: &ScoringWeights) -> Vec<ImprovementArea> {
    let mut gaps: Vec<(Metric, f64, f64)> = scores
        .iter()
        .filter(|(_, s)| s.score < SUGGESTION_THRESHOLD)
        .map(|(metric, s)| (metric, s.score, (MAX_SCORE - s.score) * weights.weight(metric)))
        .collect();
    gaps.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

    gaps.into_iter()
        .map(|(metric, score, gap)| ImprovementArea {
            area: metric.label(),
            metric,
            current_score: round2(score),
            target_score: IMPROVEMENT_TARGET,
            impact: if gap > HIGH_IMPACT_GAP {
                Impact::High
            } else {
                Impact::Medium
            },
            recommendation: recommendation(metric, score),
        })
        .collect()
}
