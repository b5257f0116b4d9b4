use thiserror::Error;

/// Errors surfaced by the scoring engine. Backend failures are not among them:
/// those degrade to fallbacks inside the evaluators.
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid grade scale: {0}")]
    InvalidGradeScale(String),

    #[error("Unknown weight profile '{0}'")]
    UnknownProfile(String),

    #[error("Cannot summarize a session with no evaluated answers")]
    EmptySession,
}
