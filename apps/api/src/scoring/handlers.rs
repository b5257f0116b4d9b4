use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::task::{JoinError, JoinSet};
use tracing::info;

use crate::errors::AppError;
use crate::scoring::evaluator::AnswerEvaluator;
use crate::scoring::feedback::{improvement_areas, ImprovementArea};
use crate::scoring::grades::GradeThreshold;
use crate::scoring::keyword_bank::{self, EvaluationPreset, PresetConfig};
use crate::scoring::session::{percentile, summarize_session, SessionSummary};
use crate::scoring::types::EvaluationResult;
use crate::scoring::weights::{ScoringWeights, WeightProfile};
use crate::state::AppState;

/// Explicit weights; validated strictly (sum 1.0 ± 0.01).
#[derive(Debug, Clone, Deserialize)]
pub struct CustomWeights {
    pub relevance: f64,
    pub grammar: f64,
    pub fluency: f64,
    pub keywords: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub expected_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    #[serde(flatten)]
    pub input: AnswerInput,
    #[serde(default)]
    pub profile: Option<String>,
    /// Takes precedence over `profile`.
    #[serde(default)]
    pub weights: Option<CustomWeights>,
    /// Rescale `weights` to sum to 1.0 instead of rejecting them.
    #[serde(default)]
    pub normalize_weights: bool,
}

#[derive(Debug, Serialize)]
pub struct ImprovementsResponse {
    pub result: EvaluationResult,
    pub improvement_areas: Vec<ImprovementArea>,
}

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub answers: Vec<AnswerInput>,
    #[serde(default)]
    pub profile: Option<String>,
    /// Past session totals used to rank this session.
    #[serde(default)]
    pub history: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
pub struct ProfileInfo {
    pub name: &'static str,
    pub weights: ScoringWeights,
}

#[derive(Debug, Serialize)]
pub struct DomainInfo {
    pub domain: &'static str,
    pub topics: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct DomainKeywords {
    pub domain: String,
    pub topics: Vec<&'static str>,
    pub keywords: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TopicKeywords {
    pub domain: String,
    pub topic: String,
    pub keywords: &'static [&'static str],
}

/// The shared evaluator, re-weighted when the request asks for it.
fn evaluator_for(
    state: &AppState,
    profile: Option<&str>,
    weights: Option<&CustomWeights>,
    normalize: bool,
) -> Result<AnswerEvaluator, AppError> {
    if let Some(w) = weights {
        let weights = if normalize {
            ScoringWeights::normalized(w.relevance, w.grammar, w.fluency, w.keywords)?
        } else {
            ScoringWeights::new(w.relevance, w.grammar, w.fluency, w.keywords)?
        };
        return Ok(state.evaluator.with_weights(weights));
    }
    match profile {
        Some(name) => {
            let profile: WeightProfile = name.parse()?;
            Ok(state.evaluator.with_weights(profile.weights()))
        }
        None => Ok(state.evaluator.as_ref().clone()),
    }
}

fn task_failed(e: JoinError) -> AppError {
    AppError::Internal(anyhow::Error::new(e).context("Answer evaluation task failed"))
}

async fn evaluate_input(
    evaluator: &AnswerEvaluator,
    input: &AnswerInput,
) -> Result<EvaluationResult, AppError> {
    let result = evaluator
        .evaluate(
            &input.question,
            &input.answer,
            input.expected_keywords.as_deref(),
            input.context.as_deref(),
        )
        .await?;
    Ok(result)
}

/// POST /api/v1/evaluations
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResult>, AppError> {
    let evaluator = evaluator_for(
        &state,
        req.profile.as_deref(),
        req.weights.as_ref(),
        req.normalize_weights,
    )?;
    let result = evaluate_input(&evaluator, &req.input).await?;
    info!(
        overall = result.overall_score,
        grade = %result.grade,
        "Answer evaluated"
    );
    Ok(Json(result))
}

/// POST /api/v1/evaluations/improvements
pub async fn handle_improvements(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<ImprovementsResponse>, AppError> {
    let evaluator = evaluator_for(
        &state,
        req.profile.as_deref(),
        req.weights.as_ref(),
        req.normalize_weights,
    )?;
    let result = evaluate_input(&evaluator, &req.input).await?;
    let areas = improvement_areas(&result.scores, evaluator.weights());
    Ok(Json(ImprovementsResponse {
        result,
        improvement_areas: areas,
    }))
}

/// POST /api/v1/sessions/summary
pub async fn handle_session_summary(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    let evaluator = Arc::new(evaluator_for(&state, req.profile.as_deref(), None, false)?);

    let mut tasks = JoinSet::new();
    for (index, input) in req.answers.into_iter().enumerate() {
        let evaluator = Arc::clone(&evaluator);
        tasks.spawn(async move { (index, evaluate_input(&evaluator, &input).await) });
    }

    let mut indexed = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.map_err(task_failed)?;
        indexed.push((index, result?));
    }
    indexed.sort_by_key(|(index, _)| *index);
    let results: Vec<EvaluationResult> = indexed.into_iter().map(|(_, r)| r).collect();

    let mut summary = summarize_session(&results, evaluator.weights(), evaluator.grades())?;
    if let Some(history) = &req.history {
        summary.percentile = Some(percentile(summary.overall_score, history));
    }

    info!(
        session_id = %summary.session_id,
        questions = summary.question_count,
        overall = summary.overall_score,
        "Session summarized"
    );
    Ok(Json(summary))
}

/// GET /api/v1/profiles
pub async fn handle_profiles() -> Json<Vec<ProfileInfo>> {
    Json(
        WeightProfile::ALL
            .into_iter()
            .map(|p| ProfileInfo {
                name: p.name(),
                weights: p.weights(),
            })
            .collect(),
    )
}

/// GET /api/v1/grades
pub async fn handle_grades(State(state): State<AppState>) -> Json<Vec<GradeThreshold>> {
    Json(state.evaluator.grades().thresholds().to_vec())
}

/// GET /api/v1/keywords
pub async fn handle_keyword_domains() -> Json<Vec<DomainInfo>> {
    Json(
        keyword_bank::domains()
            .into_iter()
            .map(|domain| DomainInfo {
                domain,
                topics: keyword_bank::topics(domain).unwrap_or_default(),
            })
            .collect(),
    )
}

/// GET /api/v1/keywords/:domain
pub async fn handle_domain_keywords(
    Path(domain): Path<String>,
) -> Result<Json<DomainKeywords>, AppError> {
    let not_found = || AppError::NotFound(format!("Keyword domain '{domain}' not found"));
    let topics = keyword_bank::topics(&domain).ok_or_else(not_found)?;
    let keywords = keyword_bank::all_keywords_for_domain(&domain).ok_or_else(not_found)?;
    Ok(Json(DomainKeywords {
        domain,
        topics,
        keywords,
    }))
}

/// GET /api/v1/keywords/:domain/:topic
pub async fn handle_topic_keywords(
    Path((domain, topic)): Path<(String, String)>,
) -> Result<Json<TopicKeywords>, AppError> {
    let keywords = keyword_bank::keywords_for_topic(&domain, &topic)
        .ok_or_else(|| AppError::NotFound(format!("Topic '{topic}' not found in '{domain}'")))?;
    Ok(Json(TopicKeywords {
        domain,
        topic,
        keywords,
    }))
}

/// GET /api/v1/presets/:name
pub async fn handle_preset(Path(name): Path<String>) -> Result<Json<PresetConfig>, AppError> {
    let preset: EvaluationPreset = name.parse().map_err(AppError::NotFound)?;
    Ok(Json(preset.config()))
}
