//! LanguageTool HTTP client: the grammar-checking backend.
//!
//! Talks to a LanguageTool server (self-hosted or public) via `/v2/check`.
//! No retries: a failed call is reported to the grammar evaluator, which
//! falls back to its rule-based checks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{BackendError, GrammarBackend, GrammarMatch};

const LANGUAGE: &str = "en-US";

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<LtMatch>,
}

#[derive(Debug, Deserialize)]
struct LtMatch {
    message: String,
    #[serde(default)]
    replacements: Vec<LtReplacement>,
    context: LtContext,
    rule: LtRule,
}

#[derive(Debug, Deserialize)]
struct LtReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct LtContext {
    text: String,
}

#[derive(Debug, Deserialize)]
struct LtRule {
    id: String,
}

impl From<LtMatch> for GrammarMatch {
    fn from(m: LtMatch) -> Self {
        GrammarMatch {
            rule_id: m.rule.id,
            message: m.message,
            context: m.context.text,
            replacements: m.replacements.into_iter().map(|r| r.value).collect(),
        }
    }
}

#[derive(Clone)]
pub struct LanguageToolClient {
    client: Client,
    base_url: String,
}

impl LanguageToolClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the client and verifies the server answers `/v2/languages`.
    pub async fn connect(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let this = Self::new(base_url, timeout)?;

        let response = this
            .client
            .get(format!("{}/v2/languages", this.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(this)
    }
}

#[async_trait]
impl GrammarBackend for LanguageToolClient {
    async fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, BackendError> {
        let response = self
            .client
            .post(format!("{}/v2/check", self.base_url))
            .form(&[("text", text), ("language", LANGUAGE)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let matches = parse_check_response(&body)?;
        debug!("LanguageTool reported {} matches", matches.len());
        Ok(matches)
    }

    fn name(&self) -> &str {
        "language_tool"
    }
}

fn parse_check_response(body: &str) -> Result<Vec<GrammarMatch>, BackendError> {
    let parsed: CheckResponse = serde_json::from_str(body)?;
    Ok(parsed.matches.into_iter().map(GrammarMatch::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECK_FIXTURE: &str = r#"{
        "software": {"name": "LanguageTool", "version": "6.4"},
        "matches": [
            {
                "message": "Possible spelling mistake found.",
                "replacements": [{"value": "receive"}, {"value": "relieve"}],
                "offset": 4,
                "length": 7,
                "context": {"text": "We recieve data", "offset": 3, "length": 7},
                "rule": {"id": "MORFOLOGIK_RULE_EN_US", "category": {"id": "TYPOS"}}
            },
            {
                "message": "The verb 'was' does not agree with 'We'.",
                "context": {"text": "We was late", "offset": 3, "length": 3},
                "rule": {"id": "NON3PRS_VERB_AGREEMENT", "category": {"id": "GRAMMAR"}}
            }
        ]
    }"#;

    #[test]
    fn test_parse_check_response_maps_matches() {
        let matches = parse_check_response(CHECK_FIXTURE).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].rule_id, "MORFOLOGIK_RULE_EN_US");
        assert_eq!(matches[0].context, "We recieve data");
        assert_eq!(matches[0].replacements, vec!["receive", "relieve"]);
        assert!(matches[1].replacements.is_empty(), "missing replacements default to empty");
    }

    #[test]
    fn test_parse_check_response_without_matches() {
        let matches = parse_check_response(r#"{"software": {}}"#).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_parse_check_response_rejects_garbage() {
        assert!(matches!(
            parse_check_response("<html>502</html>"),
            Err(BackendError::Parse(_))
        ));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = LanguageToolClient::new("http://localhost:8081/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://localhost:8081");
    }
}
