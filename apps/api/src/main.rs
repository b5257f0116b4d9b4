mod backends;
mod config;
mod errors;
mod routes;
mod scoring;
mod state;
mod text;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::backends::{
    EmbeddingBackend, GrammarBackend, HttpEmbeddingClient, LanguageToolClient, Lemmatizer,
    StemmerLemmatizer,
};
use crate::config::Config;
use crate::routes::build_router;
use crate::scoring::AnswerEvaluator;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scoring API v{}", env!("CARGO_PKG_VERSION"));

    // Optional NLP backends: any that fail to come up are left out and the
    // matching evaluator runs its heuristic fallback.
    let embedder = connect_embedder(&config).await;
    let grammar_checker = connect_grammar_checker(&config).await;
    let lemmatizer: Option<Arc<dyn Lemmatizer>> = if config.enable_lemmatizer {
        info!("Lemmatizer enabled (Snowball English)");
        Some(Arc::new(StemmerLemmatizer::english()))
    } else {
        None
    };

    let evaluator = AnswerEvaluator::builder()
        .weights(config.scoring_profile.weights())
        .embedder(embedder)
        .grammar_checker(grammar_checker)
        .lemmatizer(lemmatizer)
        .build();
    info!(
        "Answer evaluator ready (profile: {}, backends: {:?})",
        config.scoring_profile,
        evaluator.backend_status()
    );

    // Build app state
    let state = AppState {
        evaluator: Arc::new(evaluator),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_embedder(config: &Config) -> Option<Arc<dyn EmbeddingBackend>> {
    let url = config.embedding_api_url.as_deref()?;
    match HttpEmbeddingClient::connect(
        url,
        &config.embedding_model,
        config.embedding_api_key.clone(),
        config.backend_timeout,
    )
    .await
    {
        Ok(client) => {
            info!("Embedding backend connected ({url}, model {})", config.embedding_model);
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("Embedding backend unavailable, relevance falls back to keyword overlap: {e}");
            None
        }
    }
}

async fn connect_grammar_checker(config: &Config) -> Option<Arc<dyn GrammarBackend>> {
    let url = config.languagetool_url.as_deref()?;
    match LanguageToolClient::connect(url, config.backend_timeout).await {
        Ok(client) => {
            info!("LanguageTool connected ({url})");
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("LanguageTool unavailable, grammar falls back to rule-based checks: {e}");
            None
        }
    }
}
