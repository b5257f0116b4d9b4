//! Letter grades: ordered score thresholds and lookup.

use serde::Serialize;

use crate::scoring::error::ScoringError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeThreshold {
    pub min_score: f64,
    pub grade: String,
    pub label: String,
    pub feedback_prefix: String,
}

impl GradeThreshold {
    pub fn new(min_score: f64, grade: &str, label: &str, feedback_prefix: &str) -> Self {
        Self {
            min_score,
            grade: grade.to_string(),
            label: label.to_string(),
            feedback_prefix: feedback_prefix.to_string(),
        }
    }
}

/// Ordered grade thresholds, descending by `min_score`, ending in a 0 catch-all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GradeScale {
    thresholds: Vec<GradeThreshold>,
}

impl GradeScale {
    pub fn new(thresholds: Vec<GradeThreshold>) -> Result<Self, ScoringError> {
        let last = thresholds
            .last()
            .ok_or_else(|| ScoringError::InvalidGradeScale("no thresholds given".to_string()))?;

        if last.min_score != 0.0 {
            return Err(ScoringError::InvalidGradeScale(format!(
                "last threshold must start at 0, got {} for '{}'",
                last.min_score, last.grade
            )));
        }

        if let Some(pair) = thresholds
            .windows(2)
            .find(|pair| pair[0].min_score <= pair[1].min_score)
        {
            return Err(ScoringError::InvalidGradeScale(format!(
                "thresholds must be strictly descending: '{}' ({}) before '{}' ({})",
                pair[0].grade, pair[0].min_score, pair[1].grade, pair[1].min_score
            )));
        }

        Ok(Self { thresholds })
    }

    /// First threshold whose `min_score` is at or below `score`, scanning from
    /// the top. Scores below every threshold (negative, NaN) get the catch-all.
    pub fn grade_for(&self, score: f64) -> &GradeThreshold {
        self.thresholds
            .iter()
            .find(|t| score >= t.min_score)
            .unwrap_or_else(|| self.catch_all())
    }

    pub fn thresholds(&self) -> &[GradeThreshold] {
        &self.thresholds
    }

    fn catch_all(&self) -> &GradeThreshold {
        // `new` guarantees at least one threshold
        &self.thresholds[self.thresholds.len() - 1]
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            thresholds: vec![
                GradeThreshold::new(90.0, "A+", "Excellent", "Outstanding response!"),
                GradeThreshold::new(80.0, "A", "Very Good", "Great answer!"),
                GradeThreshold::new(70.0, "B+", "Good", "Well done!"),
                GradeThreshold::new(60.0, "B", "Satisfactory", "Good effort."),
                GradeThreshold::new(50.0, "C", "Needs Improvement", "Consider improving."),
                GradeThreshold::new(40.0, "D", "Poor", "Significant improvement needed."),
                GradeThreshold::new(0.0, "F", "Unsatisfactory", "Please review and try again."),
            ],
        }
    }
}
