//! Scoring weights: the fraction each metric contributes to the overall score.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scoring::error::ScoringError;
use crate::scoring::types::Metric;

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct ScoringWeights {
    relevance: f64,
    grammar: f64,
    fluency: f64,
    keywords: f64,
}

#[derive(Deserialize)]
struct RawWeights {
    relevance: f64,
    grammar: f64,
    fluency: f64,
    keywords: f64,
}

impl TryFrom<RawWeights> for ScoringWeights {
    type Error = ScoringError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        ScoringWeights::new(raw.relevance, raw.grammar, raw.fluency, raw.keywords)
    }
}

impl ScoringWeights {
    pub const BALANCED: ScoringWeights = ScoringWeights {
        relevance: 0.35,
        grammar: 0.20,
        fluency: 0.25,
        keywords: 0.20,
    };

    pub const TECHNICAL: ScoringWeights = ScoringWeights {
        relevance: 0.30,
        grammar: 0.15,
        fluency: 0.20,
        keywords: 0.35,
    };

    pub const BEHAVIORAL: ScoringWeights = ScoringWeights {
        relevance: 0.40,
        grammar: 0.15,
        fluency: 0.35,
        keywords: 0.10,
    };

    pub const COMMUNICATION: ScoringWeights = ScoringWeights {
        relevance: 0.25,
        grammar: 0.30,
        fluency: 0.35,
        keywords: 0.10,
    };

    /// Strict constructor: every weight finite and non-negative, sum within
    /// 1.0 ± `WEIGHT_SUM_TOLERANCE`.
    pub fn new(
        relevance: f64,
        grammar: f64,
        fluency: f64,
        keywords: f64,
    ) -> Result<Self, ScoringError> {
        let weights = Self {
            relevance,
            grammar,
            fluency,
            keywords,
        };
        weights.check_components()?;

        let total = weights.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeights(format!(
                "weights must sum to 1.0, got {total:.4}"
            )));
        }
        Ok(weights)
    }

    /// Lenient constructor: rescales the four values so they sum to 1.0.
    pub fn normalized(
        relevance: f64,
        grammar: f64,
        fluency: f64,
        keywords: f64,
    ) -> Result<Self, ScoringError> {
        let raw = Self {
            relevance,
            grammar,
            fluency,
            keywords,
        };
        raw.check_components()?;

        let total = raw.total();
        if total <= 0.0 {
            return Err(ScoringError::InvalidWeights(
                "at least one weight must be positive".to_string(),
            ));
        }
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            warn!("Weights sum to {total:.4}, normalizing");
        }

        Ok(Self {
            relevance: relevance / total,
            grammar: grammar / total,
            fluency: fluency / total,
            keywords: keywords / total,
        })
    }

    fn check_components(&self) -> Result<(), ScoringError> {
        for metric in Metric::ALL {
            let w = self.weight(metric);
            if !w.is_finite() || w < 0.0 {
                return Err(ScoringError::InvalidWeights(format!(
                    "{} weight must be a non-negative number, got {w}",
                    metric.label()
                )));
            }
        }
        Ok(())
    }

    pub fn weight(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Relevance => self.relevance,
            Metric::Grammar => self.grammar,
            Metric::Fluency => self.fluency,
            Metric::Keywords => self.keywords,
        }
    }

    pub fn total(&self) -> f64 {
        self.relevance + self.grammar + self.fluency + self.keywords
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Built-in weight presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightProfile {
    #[default]
    Balanced,
    /// Keywords matter more.
    Technical,
    /// Fluency and relevance matter more.
    Behavioral,
    /// Grammar and fluency emphasized.
    Communication,
}

impl WeightProfile {
    pub const ALL: [WeightProfile; 4] = [
        WeightProfile::Balanced,
        WeightProfile::Technical,
        WeightProfile::Behavioral,
        WeightProfile::Communication,
    ];

    pub fn weights(self) -> ScoringWeights {
        match self {
            WeightProfile::Balanced => ScoringWeights::BALANCED,
            WeightProfile::Technical => ScoringWeights::TECHNICAL,
            WeightProfile::Behavioral => ScoringWeights::BEHAVIORAL,
            WeightProfile::Communication => ScoringWeights::COMMUNICATION,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeightProfile::Balanced => "balanced",
            WeightProfile::Technical => "technical",
            WeightProfile::Behavioral => "behavioral",
            WeightProfile::Communication => "communication",
        }
    }
}

impl fmt::Display for WeightProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WeightProfile {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        WeightProfile::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ScoringError::UnknownProfile(s.to_string()))
    }
}
