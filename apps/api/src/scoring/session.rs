//! Session summary: aggregates several evaluated answers from one interview.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::scoring::error::ScoringError;
use crate::scoring::grades::GradeScale;
use crate::scoring::types::{round2, EvaluationResult, Metric, MAX_SCORE};
use crate::scoring::weights::ScoringWeights;

/// Second-half mean must move by more than this to count as a trend.
pub const TREND_MARGIN: f64 = 5.0;
pub const TREND_MIN_ANSWERS: usize = 3;
/// Session metric averages below this are reported as weaknesses.
pub const WEAKNESS_THRESHOLD: f64 = 60.0;
pub const MAX_NEXT_STEPS: usize = 5;
/// Readiness bonus when the metric averages span less than
/// `CONSISTENCY_SPREAD` points.
pub const CONSISTENCY_BONUS: f64 = 10.0;
pub const CONSISTENCY_SPREAD: f64 = 15.0;
/// Readiness bonus for sessions of at least `PRACTICE_MIN_QUESTIONS` answers.
pub const PRACTICE_BONUS: f64 = 5.0;
pub const PRACTICE_MIN_QUESTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAverages {
    pub relevance: f64,
    pub grammar: f64,
    pub fluency: f64,
    pub keywords: f64,
}

impl MetricAverages {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Relevance => self.relevance,
            Metric::Grammar => self.grammar,
            Metric::Fluency => self.fluency,
            Metric::Keywords => self.keywords,
        }
    }
}

/// Scores in question order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreTrends {
    pub relevance: Vec<f64>,
    pub grammar: Vec<f64>,
    pub fluency: Vec<f64>,
    pub keywords: Vec<f64>,
    pub total: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaScore {
    pub area: &'static str,
    pub metric: Metric,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improved,
    Declined,
    Consistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadinessLevel {
    Ready,
    #[serde(rename = "Almost Ready")]
    AlmostReady,
    #[serde(rename = "Needs Practice")]
    NeedsPractice,
    #[serde(rename = "Not Ready")]
    NotReady,
}

impl ReadinessLevel {
    fn for_score(score: u32) -> Self {
        if score >= 80 {
            ReadinessLevel::Ready
        } else if score >= 60 {
            ReadinessLevel::AlmostReady
        } else if score >= 40 {
            ReadinessLevel::NeedsPractice
        } else {
            ReadinessLevel::NotReady
        }
    }

    fn steps(self) -> [&'static str; 3] {
        match self {
            ReadinessLevel::Ready => [
                "You're ready for real interviews - start applying!",
                "Do a few more mock interviews to maintain confidence",
                "Research your target companies thoroughly",
            ],
            ReadinessLevel::AlmostReady => [
                "Complete 2-3 more mock interview sessions",
                "Focus on your weakest area for improvement",
                "Start scheduling real interviews while continuing practice",
            ],
            ReadinessLevel::NeedsPractice | ReadinessLevel::NotReady => [
                "Schedule daily practice sessions (15-30 minutes)",
                "Work through the recommended resources",
                "Focus on one improvement area at a time",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub score: u32,
    pub level: ReadinessLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weakness {
    pub area: &'static str,
    pub metric: Metric,
    pub score: f64,
    pub message: &'static str,
    /// 1 is the most urgent.
    pub priority: u8,
}

/// Coaching feedback for a whole session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionFeedback {
    pub rating: &'static str,
    pub weaknesses: Vec<Weakness>,
    pub readiness: Readiness,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub question_count: usize,
    pub average_scores: MetricAverages,
    pub overall_score: f64,
    pub grade: String,
    pub grade_label: String,
    pub strongest_area: AreaScore,
    pub weakest_area: AreaScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    pub score_trends: ScoreTrends,
    pub performance_summary: String,
    pub feedback: SessionFeedback,
    /// Rank against past sessions; filled in by callers that have a history.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<u32>,
}

pub fn summarize_session(
    results: &[EvaluationResult],
    weights: &ScoringWeights,
    scale: &GradeScale,
) -> Result<SessionSummary, ScoringError> {
    if results.is_empty() {
        return Err(ScoringError::EmptySession);
    }

    let mut trends = ScoreTrends::default();
    for result in results {
        trends.relevance.push(result.scores.relevance.score);
        trends.grammar.push(result.scores.grammar.score);
        trends.fluency.push(result.scores.fluency.score);
        trends.keywords.push(result.scores.keywords.score);
        trends.total.push(result.overall_score);
    }

    let averages = MetricAverages {
        relevance: round2(mean(&trends.relevance)),
        grammar: round2(mean(&trends.grammar)),
        fluency: round2(mean(&trends.fluency)),
        keywords: round2(mean(&trends.keywords)),
    };
    let overall = round2(
        Metric::ALL
            .into_iter()
            .map(|m| averages.get(m) * weights.weight(m))
            .sum(),
    );
    let threshold = scale.grade_for(overall);

    let strongest = extreme_area(&averages, |candidate, best| candidate > best);
    let weakest = extreme_area(&averages, |candidate, best| candidate < best);
    let trend = detect_trend(&trends.total);

    let feedback = session_feedback(overall, &averages, results.len());
    let performance_summary = describe(
        overall,
        &threshold.grade,
        results.len(),
        &strongest,
        &weakest,
        trend,
    );

    Ok(SessionSummary {
        session_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        question_count: results.len(),
        average_scores: averages,
        overall_score: overall,
        grade: threshold.grade.clone(),
        grade_label: threshold.label.clone(),
        strongest_area: strongest,
        weakest_area: weakest,
        trend,
        score_trends: trends,
        performance_summary,
        feedback,
        percentile: None,
    })
}

/// Percentage of historical totals strictly below `score`, rounded.
/// No history places the score at the median.
pub fn percentile(score: f64, history: &[f64]) -> u32 {
    if history.is_empty() {
        return 50;
    }
    let below = history.iter().filter(|s| **s < score).count();
    (below as f64 / history.len() as f64 * 100.0).round() as u32
}

pub fn rating(score: f64) -> &'static str {
    if score >= 85.0 {
        "Excellent"
    } else if score >= 70.0 {
        "Good"
    } else if score >= 55.0 {
        "Satisfactory"
    } else if score >= 40.0 {
        "Needs Improvement"
    } else {
        "Below Expectations"
    }
}

/// Metrics averaging under `WEAKNESS_THRESHOLD`, most urgent first.
pub fn weaknesses(averages: &MetricAverages) -> Vec<Weakness> {
    let mut found: Vec<Weakness> = Metric::ALL
        .into_iter()
        .filter_map(|metric| {
            let score = averages.get(metric);
            if score >= WEAKNESS_THRESHOLD {
                return None;
            }
            let (priority, index) = if score < 40.0 {
                (1, 2)
            } else if score < 50.0 {
                (2, 1)
            } else {
                (3, 0)
            };
            Some(Weakness {
                area: metric.label(),
                metric,
                score,
                message: weakness_messages(metric)[index],
                priority,
            })
        })
        .collect();
    found.sort_by_key(|w| w.priority);
    found
}

fn weakness_messages(metric: Metric) -> [&'static str; 3] {
    match metric {
        Metric::Relevance => [
            "Responses could be more directly focused on the question",
            "Consider structuring answers using the STAR method",
            "Some answers drifted from the main topic",
        ],
        Metric::Grammar => [
            "Some grammatical errors affected clarity",
            "Consider proofreading responses for common errors",
            "Sentence structure could be improved",
        ],
        Metric::Fluency => [
            "Response flow could be smoother",
            "Consider varying sentence length and structure",
            "Some hesitation affected response coherence",
        ],
        Metric::Keywords => [
            "Could include more technical terminology",
            "Expand coverage of expected topics",
            "Add more specific examples and details",
        ],
    }
}

/// 70% of the overall score, plus bonuses for consistent metrics and for
/// longer sessions, truncated into 0..=100.
pub fn assess_readiness(
    overall: f64,
    averages: &MetricAverages,
    question_count: usize,
) -> Readiness {
    let scores = Metric::ALL.map(|m| averages.get(m));
    let high = scores.iter().copied().fold(f64::MIN, f64::max);
    let low = scores.iter().copied().fold(f64::MAX, f64::min);

    let mut readiness = overall * 0.7;
    if high - low < CONSISTENCY_SPREAD {
        readiness += CONSISTENCY_BONUS;
    }
    if question_count >= PRACTICE_MIN_QUESTIONS {
        readiness += PRACTICE_BONUS;
    }

    let score = readiness.clamp(0.0, MAX_SCORE) as u32;
    Readiness {
        score,
        level: ReadinessLevel::for_score(score),
    }
}

/// Steps for the readiness level, then one per leading weakness, capped at
/// `MAX_NEXT_STEPS`.
pub fn next_steps(level: ReadinessLevel, weaknesses: &[Weakness]) -> Vec<String> {
    level
        .steps()
        .into_iter()
        .chain(weaknesses.iter().take(2).map(|w| match w.metric {
            Metric::Relevance => "Practice structuring responses with the STAR method",
            Metric::Grammar => "Review common grammar rules and practice writing",
            Metric::Fluency => "Practice speaking aloud and recording yourself",
            Metric::Keywords => "Review job descriptions and industry terminology",
        }))
        .take(MAX_NEXT_STEPS)
        .map(str::to_string)
        .collect()
}

pub fn session_feedback(
    overall: f64,
    averages: &MetricAverages,
    question_count: usize,
) -> SessionFeedback {
    let weaknesses = weaknesses(averages);
    let readiness = assess_readiness(overall, averages, question_count);
    let next_steps = next_steps(readiness.level, &weaknesses);
    SessionFeedback {
        rating: rating(overall),
        weaknesses,
        readiness,
        next_steps,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// First metric (in metric order) that beats every other under `better`.
fn extreme_area(averages: &MetricAverages, better: impl Fn(f64, f64) -> bool) -> AreaScore {
    let mut best = Metric::Relevance;
    for metric in Metric::ALL.into_iter().skip(1) {
        if better(averages.get(metric), averages.get(best)) {
            best = metric;
        }
    }
    AreaScore {
        area: best.label(),
        metric: best,
        score: averages.get(best),
    }
}

fn detect_trend(totals: &[f64]) -> Option<Trend> {
    if totals.len() < TREND_MIN_ANSWERS {
        return None;
    }
    let (first, second) = totals.split_at(totals.len() / 2);
    let (first, second) = (mean(first), mean(second));

    Some(if second > first + TREND_MARGIN {
        Trend::Improved
    } else if first > second + TREND_MARGIN {
        Trend::Declined
    } else {
        Trend::Consistent
    })
}

fn describe(
    overall: f64,
    grade: &str,
    question_count: usize,
    strongest: &AreaScore,
    weakest: &AreaScore,
    trend: Option<Trend>,
) -> String {
    let level = if overall >= 80.0 {
        "Excellent performance"
    } else if overall >= 65.0 {
        "Good performance"
    } else if overall >= 50.0 {
        "Satisfactory performance"
    } else {
        "Needs improvement"
    };

    let mut summary = format!(
        "{level} with overall grade {grade} ({overall:.1}/100). \
         Completed {question_count} questions. \
         Strongest area: {} ({:.1}). Area to improve: {} ({:.1}).",
        strongest.area, strongest.score, weakest.area, weakest.score
    );

    if let Some(trend) = trend {
        summary.push(' ');
        summary.push_str(match trend {
            Trend::Improved => "Performance improved throughout the session.",
            Trend::Declined => "Performance declined towards the end - consider pacing.",
            Trend::Consistent => "Performance was consistent throughout.",
        });
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::types::{Details, MetricScore, MetricScores};

    fn result(relevance: f64, grammar: f64, fluency: f64, keywords: f64) -> EvaluationResult {
        let scores = MetricScores {
            relevance: MetricScore::new(relevance, 0.35, "", Details::new()),
            grammar: MetricScore::new(grammar, 0.20, "", Details::new()),
            fluency: MetricScore::new(fluency, 0.25, "", Details::new()),
            keywords: MetricScore::new(keywords, 0.20, "", Details::new()),
        };
        let overall = crate::scoring::aggregator::overall_score(&scores, &ScoringWeights::BALANCED);
        EvaluationResult {
            question: "q".to_string(),
            answer: "a".to_string(),
            overall_score: overall,
            grade: String::new(),
            scores,
            suggestions: vec![],
            strengths: vec![],
        }
    }

    #[test]
    fn test_empty_session_is_an_error() {
        let err = summarize_session(&[], &ScoringWeights::BALANCED, &GradeScale::default())
            .unwrap_err();
        assert_eq!(err, ScoringError::EmptySession);
    }

    #[test]
    fn test_single_answer_summary() {
        let summary = summarize_session(
            &[result(80.0, 90.0, 70.0, 60.0)],
            &ScoringWeights::BALANCED,
            &GradeScale::default(),
        )
        .unwrap();

        // 28 + 18 + 17.5 + 12
        assert_eq!(summary.overall_score, 75.5);
        assert_eq!(summary.grade, "B+");
        assert_eq!(summary.grade_label, "Good");
        assert_eq!(summary.strongest_area.area, "Grammar");
        assert_eq!(summary.weakest_area.area, "Topic Coverage");
        assert!(summary.trend.is_none());
        assert_eq!(
            summary.performance_summary,
            "Good performance with overall grade B+ (75.5/100). Completed 1 questions. \
             Strongest area: Grammar (90.0). Area to improve: Topic Coverage (60.0)."
        );
    }

    #[test]
    fn test_averages_and_trends() {
        let results = [
            result(40.0, 60.0, 50.0, 20.0),
            result(60.0, 80.0, 70.0, 60.0),
            result(80.0, 100.0, 90.0, 100.0),
        ];
        let summary =
            summarize_session(&results, &ScoringWeights::BALANCED, &GradeScale::default()).unwrap();

        assert_eq!(summary.average_scores.relevance, 60.0);
        assert_eq!(summary.average_scores.keywords, 60.0);
        assert_eq!(summary.score_trends.grammar, vec![60.0, 80.0, 100.0]);
        assert_eq!(summary.score_trends.total.len(), 3);
        assert_eq!(summary.trend, Some(Trend::Improved));
        assert!(summary
            .performance_summary
            .ends_with("Performance improved throughout the session."));
        // relevance ties keywords at 60; the first in metric order wins
        assert_eq!(summary.weakest_area.metric, Metric::Relevance);
    }

    #[test]
    fn test_single_answer_feedback() {
        let summary = summarize_session(
            &[result(80.0, 90.0, 70.0, 60.0)],
            &ScoringWeights::BALANCED,
            &GradeScale::default(),
        )
        .unwrap();

        let feedback = &summary.feedback;
        assert_eq!(feedback.rating, "Good");
        // 60 is not below the weakness threshold
        assert!(feedback.weaknesses.is_empty());
        // 75.5 * 0.7, spread 30, one question
        assert_eq!(feedback.readiness.score, 52);
        assert_eq!(feedback.readiness.level, ReadinessLevel::NeedsPractice);
        assert_eq!(feedback.next_steps.len(), 3);
        assert_eq!(feedback.next_steps[0], "Schedule daily practice sessions (15-30 minutes)");
    }

    #[test]
    fn test_weak_session_feedback() {
        let summary = summarize_session(
            &[result(35.0, 45.0, 55.0, 90.0)],
            &ScoringWeights::BALANCED,
            &GradeScale::default(),
        )
        .unwrap();
        assert_eq!(summary.overall_score, 53.0);

        let feedback = &summary.feedback;
        assert_eq!(feedback.rating, "Needs Improvement");
        let areas: Vec<(Metric, u8)> =
            feedback.weaknesses.iter().map(|w| (w.metric, w.priority)).collect();
        assert_eq!(
            areas,
            vec![(Metric::Relevance, 1), (Metric::Grammar, 2), (Metric::Fluency, 3)]
        );
        assert_eq!(feedback.weaknesses[0].message, "Some answers drifted from the main topic");
        assert_eq!(feedback.weaknesses[2].message, "Response flow could be smoother");

        assert_eq!(feedback.readiness.score, 37);
        assert_eq!(feedback.readiness.level, ReadinessLevel::NotReady);
        assert_eq!(feedback.next_steps.len(), MAX_NEXT_STEPS);
        assert_eq!(feedback.next_steps[3], "Practice structuring responses with the STAR method");
        assert_eq!(feedback.next_steps[4], "Review common grammar rules and practice writing");
    }

    #[test]
    fn test_readiness_bonuses_and_levels() {
        let even = |v: f64| MetricAverages {
            relevance: v,
            grammar: v,
            fluency: v,
            keywords: v,
        };

        let ready = assess_readiness(95.0, &even(95.0), 5);
        assert_eq!(ready.score, 81);
        assert_eq!(ready.level, ReadinessLevel::Ready);

        let almost = assess_readiness(80.0, &even(80.0), 1);
        assert_eq!(almost.score, 66);
        assert_eq!(almost.level, ReadinessLevel::AlmostReady);

        assert_eq!(assess_readiness(0.0, &even(0.0), 0).score, 10);
        assert_eq!(
            serde_json::to_value(ReadinessLevel::AlmostReady).unwrap(),
            "Almost Ready"
        );
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(rating(85.0), "Excellent");
        assert_eq!(rating(84.99), "Good");
        assert_eq!(rating(55.0), "Satisfactory");
        assert_eq!(rating(40.0), "Needs Improvement");
        assert_eq!(rating(39.9), "Below Expectations");
    }

    #[test]
    fn test_declining_and_consistent_trends() {
        assert_eq!(detect_trend(&[90.0, 80.0, 60.0, 50.0]), Some(Trend::Declined));
        assert_eq!(detect_trend(&[70.0, 72.0, 68.0]), Some(Trend::Consistent));
        assert_eq!(detect_trend(&[10.0, 90.0]), None);
    }

    #[test]
    fn test_summary_uses_custom_weights() {
        let summary = summarize_session(
            &[result(100.0, 0.0, 0.0, 0.0)],
            &ScoringWeights::BEHAVIORAL,
            &GradeScale::default(),
        )
        .unwrap();
        assert_eq!(summary.overall_score, 40.0);
        assert_eq!(summary.grade, "D");
    }

    #[test]
    fn test_percentile() {
        assert_eq!(percentile(70.0, &[]), 50);
        assert_eq!(percentile(70.0, &[50.0, 60.0, 70.0, 80.0]), 50);
        assert_eq!(percentile(100.0, &[10.0, 20.0, 30.0]), 100);
        assert_eq!(percentile(0.0, &[10.0, 20.0, 30.0]), 0);
        assert_eq!(percentile(25.0, &[10.0, 20.0, 30.0]), 67);
    }
}
