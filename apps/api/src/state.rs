use std::sync::Arc;

use crate::config::Config;
use crate::scoring::AnswerEvaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup with whichever optional backends came up.
    pub evaluator: Arc<AnswerEvaluator>,
    pub config: Config,
}
