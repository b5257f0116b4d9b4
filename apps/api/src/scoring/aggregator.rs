//! Weighted combination of the four metric scores.

use crate::scoring::types::{round2, MetricScores, MAX_SCORE};
use crate::scoring::weights::ScoringWeights;

/// `Σ score × weight` over the four metrics, clamped to [0, 100] and rounded
/// to 2 decimals.
pub fn overall_score(scores: &MetricScores, weights: &ScoringWeights) -> f64 {
    let total: f64 = scores
        .iter()
        .map(|(metric, s)| s.score * weights.weight(metric))
        .sum();
    round2(total.clamp(0.0, MAX_SCORE))
}
