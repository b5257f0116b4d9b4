//! Grammar: start at 100 and deduct per detected issue.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::backends::{GrammarBackend, GrammarMatch};
use crate::scoring::types::{details, MetricScore, MAX_SCORE};
use crate::text::split_sentences;

pub const GRAMMAR_WEIGHT: f64 = 0.20;
/// Flat deduction for each issue found by the rule-based checker.
pub const RULE_BASED_DEDUCTION: f64 = 3.0;
pub const MAX_REPORTED_ERRORS: usize = 10;
pub const MAX_SUGGESTIONS_PER_ERROR: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Spelling,
    Punctuation,
    Agreement,
    Grammar,
    Capitalization,
    Style,
}

impl Severity {
    /// Maps a backend rule id onto a severity bucket.
    pub fn classify(rule_id: &str) -> Self {
        if rule_id.starts_with("MORFOLOGIK") {
            Severity::Spelling
        } else if rule_id.contains("COMMA") || rule_id.contains("WHITESPACE") {
            Severity::Punctuation
        } else if rule_id.contains("AGREEMENT") {
            Severity::Agreement
        } else {
            Severity::Grammar
        }
    }

    /// Points deducted for one backend-reported issue of this severity.
    pub fn deduction(self) -> f64 {
        match self {
            Severity::Punctuation => 1.0,
            Severity::Agreement => 3.0,
            Severity::Spelling | Severity::Grammar | Severity::Capitalization | Severity::Style => {
                2.0
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrammarIssue {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl GrammarIssue {
    fn rule(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            context: None,
            severity,
            suggestions: Vec::new(),
        }
    }
}

impl From<GrammarMatch> for GrammarIssue {
    fn from(m: GrammarMatch) -> Self {
        let severity = Severity::classify(&m.rule_id);
        Self {
            message: m.message,
            context: Some(m.context),
            severity,
            suggestions: m
                .replacements
                .into_iter()
                .take(MAX_SUGGESTIONS_PER_ERROR)
                .collect(),
        }
    }
}

struct CommonMistake {
    pattern: &'static str,
    message: &'static str,
    severity: Severity,
}

const COMMON_MISTAKES: &[CommonMistake] = &[
    CommonMistake {
        pattern: r"(?i)\bits\s+a\s+",
        message: r#"Check usage of "its" vs "it's""#,
        severity: Severity::Grammar,
    },
    CommonMistake {
        pattern: r"(?i)\byour\s+welcome\b",
        message: r#"Should be "you're welcome""#,
        severity: Severity::Grammar,
    },
    CommonMistake {
        pattern: r"(?i)\btheir\s+is\b",
        message: r#"Should be "there is""#,
        severity: Severity::Grammar,
    },
    CommonMistake {
        pattern: r"(?i)\bcould\s+of\b",
        message: r#"Should be "could have""#,
        severity: Severity::Grammar,
    },
    CommonMistake {
        pattern: r"(?i)\bshould\s+of\b",
        message: r#"Should be "should have""#,
        severity: Severity::Grammar,
    },
    CommonMistake {
        pattern: r"(?i)\b(gonna|wanna|kinda|sorta|gotta|dunno)\b",
        message: "Avoid informal contractions in a professional answer",
        severity: Severity::Style,
    },
];

static MISTAKE_PATTERNS: OnceLock<Vec<(Regex, &'static CommonMistake)>> = OnceLock::new();
static LOWERCASE_PRONOUN: OnceLock<Regex> = OnceLock::new();

fn mistake_patterns() -> &'static [(Regex, &'static CommonMistake)] {
    MISTAKE_PATTERNS.get_or_init(|| {
        COMMON_MISTAKES
            .iter()
            .filter_map(|m| Regex::new(m.pattern).ok().map(|re| (re, m)))
            .collect()
    })
}

fn lowercase_pronoun() -> &'static Regex {
    LOWERCASE_PRONOUN.get_or_init(|| Regex::new(r"\bi\b").expect("static pronoun regex"))
}

/// A standalone lowercase "i", skipping the "i.e." abbreviation.
fn has_lowercase_pronoun(text: &str) -> bool {
    lowercase_pronoun()
        .find_iter(text)
        .any(|m| !text[m.end()..].starts_with(".e"))
}

/// Deterministic checks used when no grammar backend is available. Each
/// pattern is reported at most once; sentence-start capitalization is
/// reported per sentence.
pub fn rule_based_issues(text: &str) -> Vec<GrammarIssue> {
    let mut issues = Vec::new();

    if text.contains("  ") {
        issues.push(GrammarIssue::rule("Double spaces detected", Severity::Punctuation));
    }

    for (i, sentence) in split_sentences(text).iter().enumerate() {
        if sentence.chars().next().is_some_and(char::is_lowercase) {
            issues.push(GrammarIssue::rule(
                format!("Sentence {} should start with a capital letter", i + 1),
                Severity::Capitalization,
            ));
        }
    }

    if has_lowercase_pronoun(text) {
        issues.push(GrammarIssue::rule(
            r#"The pronoun "I" should always be capitalized"#,
            Severity::Capitalization,
        ));
    }

    for (re, mistake) in mistake_patterns() {
        if re.is_match(text) {
            issues.push(GrammarIssue::rule(mistake.message, mistake.severity));
        }
    }

    issues
}

#[derive(Clone)]
pub struct GrammarEvaluator {
    checker: Option<Arc<dyn GrammarBackend>>,
    weight: f64,
}

impl GrammarEvaluator {
    pub fn new(checker: Option<Arc<dyn GrammarBackend>>, weight: f64) -> Self {
        Self { checker, weight }
    }

    pub async fn evaluate(&self, answer: &str) -> MetricScore {
        let mut info = details(json!({}));

        let checked = match &self.checker {
            Some(checker) => match checker.check(answer).await {
                Ok(matches) => Some((checker.name().to_string(), matches)),
                Err(e) => {
                    warn!("Grammar backend failed, using rule-based checks: {e}");
                    info.insert("backend_error".into(), json!(e.to_string()));
                    None
                }
            },
            None => None,
        };

        let (issues, deductions) = match checked {
            Some((backend, matches)) => {
                let issues: Vec<GrammarIssue> = matches.into_iter().map(GrammarIssue::from).collect();
                let deductions: f64 = issues.iter().map(|i| i.severity.deduction()).sum();
                info.insert("method".into(), json!("language_tool"));
                info.insert("backend".into(), json!(backend));
                (issues, deductions)
            }
            None => {
                let issues = rule_based_issues(answer);
                let deductions = issues.len() as f64 * RULE_BASED_DEDUCTION;
                info.insert("method".into(), json!("rule_based"));
                (issues, deductions)
            }
        };

        let total_errors = issues.len();
        let reported: Vec<&GrammarIssue> = issues.iter().take(MAX_REPORTED_ERRORS).collect();
        info.insert("errors".into(), json!(reported));
        info.insert("total_errors".into(), json!(total_errors));
        info.insert("deductions".into(), json!(deductions));

        let final_score = (MAX_SCORE - deductions).max(0.0);
        MetricScore::new(final_score, self.weight, grammar_feedback(total_errors), info)
    }
}

fn grammar_feedback(error_count: usize) -> &'static str {
    match error_count {
        0 => "Excellent grammar! No errors detected.",
        1..=2 => "Good grammar with minor issues. Review the highlighted errors.",
        3..=5 => "Several grammar issues found. Consider proofreading your answer.",
        _ => "Multiple grammar errors detected. Focus on sentence structure and spelling.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::BackendError;
    use async_trait::async_trait;

    struct FixedChecker(Vec<GrammarMatch>);

    #[async_trait]
    impl GrammarBackend for FixedChecker {
        async fn check(&self, _text: &str) -> Result<Vec<GrammarMatch>, BackendError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct DownChecker;

    #[async_trait]
    impl GrammarBackend for DownChecker {
        async fn check(&self, _text: &str) -> Result<Vec<GrammarMatch>, BackendError> {
            Err(BackendError::EmptyResponse)
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    fn grammar_match(rule_id: &str, replacements: &[&str]) -> GrammarMatch {
        GrammarMatch {
            rule_id: rule_id.to_string(),
            message: format!("{rule_id} triggered"),
            context: "...".to_string(),
            replacements: replacements.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_classify_rule_ids() {
        assert_eq!(Severity::classify("MORFOLOGIK_RULE_EN_US"), Severity::Spelling);
        assert_eq!(Severity::classify("COMMA_PARENTHESIS_WHITESPACE"), Severity::Punctuation);
        assert_eq!(Severity::classify("WHITESPACE_RULE"), Severity::Punctuation);
        assert_eq!(Severity::classify("SUBJECT_VERB_AGREEMENT"), Severity::Agreement);
        assert_eq!(Severity::classify("EN_A_VS_AN"), Severity::Grammar);
    }

    #[test]
    fn test_clean_text_has_no_rule_issues() {
        let text = "I am confident in this design. It scales well horizontally.";
        assert!(rule_based_issues(text).is_empty());
    }

    #[test]
    fn test_lowercase_pronoun_skips_abbreviation() {
        assert!(has_lowercase_pronoun("then i left"));
        assert!(!has_lowercase_pronoun("caches, i.e. memory"));
        assert!(!has_lowercase_pronoun("I left"));
    }

    #[test]
    fn test_rule_based_flags_each_category() {
        let issues = rule_based_issues("its a  problem. i could of fixed it. your welcome");
        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Double spaces detected",
                "Sentence 1 should start with a capital letter",
                "Sentence 2 should start with a capital letter",
                "Sentence 3 should start with a capital letter",
                r#"The pronoun "I" should always be capitalized"#,
                r#"Check usage of "its" vs "it's""#,
                r#"Should be "you're welcome""#,
                r#"Should be "could have""#,
            ]
        );
    }

    #[test]
    fn test_repeated_pattern_counts_once() {
        let issues = rule_based_issues("We are gonna ship. They are gonna test. Then we wanna rest.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Style);
    }

    #[tokio::test]
    async fn test_rule_based_score() {
        let evaluator = GrammarEvaluator::new(None, GRAMMAR_WEIGHT);
        let score = evaluator
            .evaluate("sql is like tables. i think sql is better because its more popular")
            .await;
        // two lowercase sentence starts + lowercase pronoun
        assert_eq!(score.score, 91.0);
        assert_eq!(score.detail_u64("total_errors"), Some(3));
        assert_eq!(score.details["method"], "rule_based");
        assert!(score.feedback.starts_with("Several grammar issues"));
    }

    #[tokio::test]
    async fn test_perfect_answer_scores_full() {
        let evaluator = GrammarEvaluator::new(None, GRAMMAR_WEIGHT);
        let score = evaluator.evaluate("This answer is clean. It has no issues.").await;
        assert_eq!(score.score, 100.0);
        assert_eq!(score.feedback, "Excellent grammar! No errors detected.");
    }

    #[tokio::test]
    async fn test_backend_deductions_by_severity() {
        let checker = FixedChecker(vec![
            grammar_match("MORFOLOGIK_RULE_EN_US", &["a", "b", "c", "d"]),
            grammar_match("COMMA_COMPOUND_SENTENCE", &[]),
            grammar_match("AGREEMENT_SENT_START", &["is"]),
            grammar_match("EN_A_VS_AN", &["an"]),
        ]);
        let evaluator = GrammarEvaluator::new(Some(Arc::new(checker)), GRAMMAR_WEIGHT);
        let score = evaluator.evaluate("whatever").await;

        // 2 + 1 + 3 + 2
        assert_eq!(score.score, 92.0);
        assert_eq!(score.details["method"], "language_tool");
        assert_eq!(score.details["errors"][0]["severity"], "spelling");
        assert_eq!(score.details["errors"][0]["suggestions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_backend_error_list_is_capped() {
        let matches = (0..14).map(|_| grammar_match("EN_A_VS_AN", &[])).collect();
        let evaluator = GrammarEvaluator::new(Some(Arc::new(FixedChecker(matches))), GRAMMAR_WEIGHT);
        let score = evaluator.evaluate("whatever").await;

        assert_eq!(score.details["errors"].as_array().unwrap().len(), MAX_REPORTED_ERRORS);
        assert_eq!(score.detail_u64("total_errors"), Some(14));
        assert_eq!(score.score, 72.0);
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back() {
        let evaluator = GrammarEvaluator::new(Some(Arc::new(DownChecker)), GRAMMAR_WEIGHT);
        let score = evaluator.evaluate("this starts lowercase.").await;
        assert_eq!(score.details["method"], "rule_based");
        assert!(score.details.contains_key("backend_error"));
        assert_eq!(score.score, 97.0);
    }

    #[tokio::test]
    async fn test_score_floors_at_zero() {
        let evaluator = GrammarEvaluator::new(None, GRAMMAR_WEIGHT);
        let text = (0..40).map(|_| "lower start").collect::<Vec<_>>().join(". ");
        let score = evaluator.evaluate(&text).await;
        assert_eq!(score.score, 0.0);
    }
}
