use std::time::Duration;

use anyhow::{Context, Result};

use crate::scoring::weights::WeightProfile;

/// Application configuration loaded from environment variables.
/// Only optional backends are configurable; every variable has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub scoring_profile: WeightProfile,
    pub languagetool_url: Option<String>,
    pub embedding_api_url: Option<String>,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub enable_lemmatizer: bool,
    pub backend_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            scoring_profile: env_or("SCORING_PROFILE", "balanced")
                .parse::<WeightProfile>()
                .context("SCORING_PROFILE must be balanced, technical, behavioral or communication")?,
            languagetool_url: optional_env("LANGUAGETOOL_URL"),
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_model: env_or("EMBEDDING_MODEL", "all-MiniLM-L6-v2"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            enable_lemmatizer: parse_bool(&env_or("ENABLE_LEMMATIZER", "true"))
                .context("ENABLE_LEMMATIZER must be true or false")?,
            backend_timeout: Duration::from_secs(
                env_or("BACKEND_TIMEOUT_SECS", "10")
                    .parse::<u64>()
                    .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            scoring_profile: WeightProfile::Balanced,
            languagetool_url: None,
            embedding_api_url: None,
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            embedding_api_key: None,
            enable_lemmatizer: true,
            backend_timeout: Duration::from_secs(10),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset and blank both count as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => anyhow::bail!("'{other}' is not a boolean"),
    }
}
