//! Answer-scoring engine: four metric evaluators, weighted aggregation,
//! grading and feedback.

pub mod aggregator;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod fluency;
pub mod grades;
pub mod grammar;
pub mod handlers;
pub mod keyword_bank;
pub mod keywords;
pub mod relevance;
pub mod session;
pub mod types;
pub mod weights;

pub use error::ScoringError;
pub use evaluator::AnswerEvaluator;
