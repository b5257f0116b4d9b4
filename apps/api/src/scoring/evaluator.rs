//! Answer evaluation: orchestrates the full scoring pipeline.
//!
//! Flow: validate → clean text → (derive keywords) → relevance ∥ grammar →
//!       fluency → keywords → weighted overall → grade → strengths/suggestions.
//!
//! Backends are acquired by the caller and handed in through the builder. A
//! missing backend is not an error; each evaluator carries its own fallback.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::backends::{EmbeddingBackend, GrammarBackend, Lemmatizer};
use crate::scoring::aggregator::overall_score;
use crate::scoring::error::ScoringError;
use crate::scoring::feedback::{generate_suggestions, identify_strengths};
use crate::scoring::fluency::FluencyEvaluator;
use crate::scoring::grades::GradeScale;
use crate::scoring::grammar::GrammarEvaluator;
use crate::scoring::keywords::{extract_keywords_from_question, KeywordEvaluator};
use crate::scoring::relevance::RelevanceEvaluator;
use crate::scoring::types::{EvaluationResult, Metric, MetricScores};
use crate::scoring::weights::ScoringWeights;
use crate::text::clean_text;

/// Which optional backends the evaluator is running with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub embeddings: Option<String>,
    pub grammar: Option<String>,
    pub lemmatizer: bool,
}

#[derive(Clone, Default)]
struct Backends {
    embedder: Option<Arc<dyn EmbeddingBackend>>,
    grammar_checker: Option<Arc<dyn GrammarBackend>>,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
}

/// Scores (question, answer) pairs. Cheap to clone; backends are shared.
#[derive(Clone)]
pub struct AnswerEvaluator {
    weights: ScoringWeights,
    grades: GradeScale,
    backends: Backends,
    relevance: RelevanceEvaluator,
    grammar: GrammarEvaluator,
    fluency: FluencyEvaluator,
    keywords: KeywordEvaluator,
}

#[derive(Default)]
pub struct AnswerEvaluatorBuilder {
    weights: ScoringWeights,
    grades: GradeScale,
    backends: Backends,
}

impl AnswerEvaluatorBuilder {
    pub fn weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn grades(mut self, grades: GradeScale) -> Self {
        self.grades = grades;
        self
    }

    pub fn embedder(mut self, embedder: Option<Arc<dyn EmbeddingBackend>>) -> Self {
        self.backends.embedder = embedder;
        self
    }

    pub fn grammar_checker(mut self, checker: Option<Arc<dyn GrammarBackend>>) -> Self {
        self.backends.grammar_checker = checker;
        self
    }

    pub fn lemmatizer(mut self, lemmatizer: Option<Arc<dyn Lemmatizer>>) -> Self {
        self.backends.lemmatizer = lemmatizer;
        self
    }

    pub fn build(self) -> AnswerEvaluator {
        AnswerEvaluator::assemble(self.weights, self.grades, self.backends)
    }
}

impl AnswerEvaluator {
    pub fn builder() -> AnswerEvaluatorBuilder {
        AnswerEvaluatorBuilder::default()
    }

    /// No optional backends: every metric takes its deterministic path.
    pub fn heuristic() -> Self {
        Self::builder().build()
    }

    fn assemble(weights: ScoringWeights, grades: GradeScale, backends: Backends) -> Self {
        Self {
            relevance: RelevanceEvaluator::new(
                backends.embedder.clone(),
                weights.weight(Metric::Relevance),
            ),
            grammar: GrammarEvaluator::new(
                backends.grammar_checker.clone(),
                weights.weight(Metric::Grammar),
            ),
            fluency: FluencyEvaluator::new(weights.weight(Metric::Fluency)),
            keywords: KeywordEvaluator::new(
                backends.lemmatizer.clone(),
                weights.weight(Metric::Keywords),
            ),
            weights,
            grades,
            backends,
        }
    }

    /// Same backends and grade scale, different weights.
    pub fn with_weights(&self, weights: ScoringWeights) -> Self {
        Self::assemble(weights, self.grades.clone(), self.backends.clone())
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn grades(&self) -> &GradeScale {
        &self.grades
    }

    pub fn backend_status(&self) -> BackendStatus {
        BackendStatus {
            embeddings: self.backends.embedder.as_ref().map(|b| b.name().to_string()),
            grammar: self
                .backends
                .grammar_checker
                .as_ref()
                .map(|b| b.name().to_string()),
            lemmatizer: self.backends.lemmatizer.is_some(),
        }
    }

    /// Scores one answer.
    ///
    /// `expected_keywords: None` derives keywords from the question;
    /// an empty slice means none are expected. Fails only when the question or
    /// answer is blank.
    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        expected_keywords: Option<&[String]>,
        context: Option<&str>,
    ) -> Result<EvaluationResult, ScoringError> {
        if question.trim().is_empty() {
            return Err(ScoringError::InvalidInput("question cannot be empty".to_string()));
        }
        if answer.trim().is_empty() {
            return Err(ScoringError::InvalidInput("answer cannot be empty".to_string()));
        }

        let question = clean_text(question);
        let answer = clean_text(answer);

        let extracted;
        let expected = match expected_keywords {
            Some(keywords) => keywords,
            None => {
                extracted = extract_keywords_from_question(&question);
                debug!(keywords = ?extracted, "Derived expected keywords from question");
                extracted.as_slice()
            }
        };

        let (relevance, grammar) = tokio::join!(
            self.relevance.evaluate(&question, &answer, context),
            self.grammar.evaluate(&answer),
        );
        let scores = MetricScores {
            relevance,
            grammar,
            fluency: self.fluency.evaluate(&answer),
            keywords: self.keywords.evaluate(&answer, expected),
        };

        let overall = overall_score(&scores, &self.weights);
        let grade = self.grades.grade_for(overall).grade.clone();

        debug!(
            overall,
            grade = %grade,
            relevance = scores.relevance.score,
            grammar = scores.grammar.score,
            fluency = scores.fluency.score,
            keywords = scores.keywords.score,
            "Evaluated answer"
        );

        Ok(EvaluationResult {
            suggestions: generate_suggestions(&scores),
            strengths: identify_strengths(&scores),
            question,
            answer,
            overall_score: overall,
            grade,
            scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{BackendError, GrammarMatch, StemmerLemmatizer};
    use crate::scoring::weights::WeightProfile;
    use async_trait::async_trait;

    const OOP_ANSWER: &str = "Object oriented programming is a way to build programs from objects. \
        Each object is made from a class, and the class holds data and the code that works on it. \
        First, encapsulation keeps the data of an object safe inside its class. \
        Second, inheritance lets one class reuse the code of another class. \
        Also, polymorphism lets objects of different classes be used through the same interface. \
        Finally, abstraction hides the details so that programs stay simple to read.";

    const POOR_ANSWER: &str = "sql is like tables... i think sql is better because its more popular";

    const NO_KEYWORDS: &[String] = &[];

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct UnreachableEmbedder;

    #[async_trait]
    impl EmbeddingBackend for UnreachableEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, BackendError> {
            Err(BackendError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            })
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    struct UnreachableChecker;

    #[async_trait]
    impl GrammarBackend for UnreachableChecker {
        async fn check(&self, _text: &str) -> Result<Vec<GrammarMatch>, BackendError> {
            Err(BackendError::EmptyResponse)
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    #[tokio::test]
    async fn test_strong_technical_answer() {
        let keywords = strings(&[
            "object",
            "class",
            "encapsulation",
            "inheritance",
            "polymorphism",
            "abstraction",
        ]);
        let result = AnswerEvaluator::heuristic()
            .evaluate("What is Object-Oriented Programming?", OOP_ANSWER, Some(keywords.as_slice()), None)
            .await
            .unwrap();

        assert!(result.overall_score >= 70.0, "overall {}", result.overall_score);
        assert!(
            ["A+", "A", "B+"].contains(&result.grade.as_str()),
            "grade {}",
            result.grade
        );
        assert!(result.scores.keywords.detail_strings("found").len() >= 5);
        assert_eq!(result.scores.grammar.score, 100.0);
        assert_eq!(result.scores.fluency.score, 100.0);
        assert_eq!(result.overall_score, 71.34);
        assert_eq!(result.grade, "B+");
        assert_eq!(
            result.strengths,
            vec![
                "Strong grammar and spelling",
                "Well-structured and coherent response",
                "Good use of technical terminology",
            ]
        );
        assert_eq!(
            result.suggestions,
            vec!["Read the question carefully and ensure your answer directly addresses it."]
        );
    }

    #[tokio::test]
    async fn test_poor_answer_grades_low() {
        let keywords = strings(&["relational", "schema", "ACID", "normalization"]);
        let result = AnswerEvaluator::heuristic()
            .evaluate(
                "What is the difference between SQL and NoSQL databases?",
                POOR_ANSWER,
                Some(keywords.as_slice()),
                None,
            )
            .await
            .unwrap();

        assert_eq!(result.scores.keywords.score, 0.0);
        assert!(result.scores.grammar.score < 100.0);
        assert_eq!(result.scores.relevance.score, 20.0);
        assert_eq!(result.scores.grammar.score, 91.0);
        assert_eq!(result.scores.fluency.score, 50.0);
        assert_eq!(result.overall_score, 37.7);
        assert!(["D", "F"].contains(&result.grade.as_str()));
        assert_eq!(result.strengths, vec!["Strong grammar and spelling".to_string()]);
        // grammar stays above 70, so it adds no suggestion
        assert_eq!(result.suggestions.len(), 4);
        assert_eq!(
            result.suggestions[3],
            "Include key terms: relational, schema, ACID"
        );
    }

    #[tokio::test]
    async fn test_blank_inputs_are_rejected() {
        let evaluator = AnswerEvaluator::heuristic();
        assert!(matches!(
            evaluator.evaluate("", "some answer", None, None).await,
            Err(ScoringError::InvalidInput(_))
        ));
        assert!(matches!(
            evaluator.evaluate("question?", "   ", None, None).await,
            Err(ScoringError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_text_is_normalized() {
        let result = AnswerEvaluator::heuristic()
            .evaluate("  What is   a mutex? ", " A mutex is\na lock. ", Some(NO_KEYWORDS), None)
            .await
            .unwrap();
        assert_eq!(result.question, "What is a mutex?");
        assert_eq!(result.answer, "A mutex is a lock.");
        assert_eq!(result.scores.keywords.score, 75.0);
    }

    #[tokio::test]
    async fn test_keywords_derived_from_question_when_absent() {
        let result = AnswerEvaluator::heuristic()
            .evaluate(
                "Explain database indexing",
                "An index lets the database find rows without a full scan.",
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(
            result.scores.keywords.detail_strings("expected"),
            vec!["database", "indexing"]
        );
        assert_eq!(result.scores.keywords.detail_strings("found"), vec!["database"]);
        assert_eq!(result.scores.keywords.score, 50.0);
    }

    #[tokio::test]
    async fn test_heuristic_mode_is_deterministic() {
        let evaluator = AnswerEvaluator::heuristic();
        let first = evaluator.evaluate("What is OOP?", OOP_ANSWER, None, None).await.unwrap();
        for _ in 0..5 {
            let again = evaluator.evaluate("What is OOP?", OOP_ANSWER, None, None).await.unwrap();
            assert_eq!(again, first);
        }
    }

    #[tokio::test]
    async fn test_scores_stay_in_bounds() {
        let evaluator = AnswerEvaluator::heuristic();
        let expected = strings(&["thing"]);
        let answers = [
            "x",
            POOR_ANSWER,
            OOP_ANSWER,
            "gonna gonna  gonna. could of. should of. its a thing. their is one. your welcome.",
        ];
        for answer in answers {
            let result = evaluator
                .evaluate("Why?", answer, Some(expected.as_slice()), None)
                .await
                .unwrap();
            assert!((0.0..=100.0).contains(&result.overall_score));
            for (metric, score) in result.scores.iter() {
                assert!((0.0..=100.0).contains(&score.score), "{metric:?} out of range");
                assert_eq!(score.max_score, 100.0);
            }
        }
    }

    #[tokio::test]
    async fn test_weights_flow_into_metric_scores() {
        let technical = AnswerEvaluator::heuristic().with_weights(WeightProfile::Technical.weights());
        let result = technical
            .evaluate("What is OOP?", OOP_ANSWER, Some(NO_KEYWORDS), None)
            .await
            .unwrap();
        assert_eq!(result.scores.keywords.weight, 0.35);
        assert_eq!(result.scores.relevance.weight, 0.30);
        assert_eq!(technical.weights(), &ScoringWeights::TECHNICAL);
    }

    #[tokio::test]
    async fn test_failing_backends_match_heuristic_scores() {
        let degraded = AnswerEvaluator::builder()
            .embedder(Some(Arc::new(UnreachableEmbedder)))
            .grammar_checker(Some(Arc::new(UnreachableChecker)))
            .build();
        let heuristic = AnswerEvaluator::heuristic();

        let a = degraded.evaluate("What is OOP?", OOP_ANSWER, None, None).await.unwrap();
        let b = heuristic.evaluate("What is OOP?", OOP_ANSWER, None, None).await.unwrap();

        assert_eq!(a.overall_score, b.overall_score);
        assert_eq!(a.grade, b.grade);
        assert!(a.scores.relevance.details.contains_key("backend_error"));
        assert!(a.scores.grammar.details.contains_key("backend_error"));
    }

    #[test]
    fn test_backend_status() {
        assert_eq!(
            AnswerEvaluator::heuristic().backend_status(),
            BackendStatus {
                embeddings: None,
                grammar: None,
                lemmatizer: false,
            }
        );

        let with_lemmatizer = AnswerEvaluator::builder()
            .lemmatizer(Some(Arc::new(StemmerLemmatizer::english())))
            .grammar_checker(Some(Arc::new(UnreachableChecker)))
            .build()
            .with_weights(ScoringWeights::BEHAVIORAL);
        let status = with_lemmatizer.backend_status();
        assert!(status.lemmatizer);
        assert_eq!(status.grammar.as_deref(), Some("unreachable"));
    }
}
