pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Evaluation API
        .route("/api/v1/evaluations", post(handlers::handle_evaluate))
        .route(
            "/api/v1/evaluations/improvements",
            post(handlers::handle_improvements),
        )
        .route(
            "/api/v1/sessions/summary",
            post(handlers::handle_session_summary),
        )
        // Reference data
        .route("/api/v1/profiles", get(handlers::handle_profiles))
        .route("/api/v1/grades", get(handlers::handle_grades))
        .route("/api/v1/keywords", get(handlers::handle_keyword_domains))
        .route(
            "/api/v1/keywords/:domain",
            get(handlers::handle_domain_keywords),
        )
        .route(
            "/api/v1/keywords/:domain/:topic",
            get(handlers::handle_topic_keywords),
        )
        .route("/api/v1/presets/:name", get(handlers::handle_preset))
        .with_state(state)
}
