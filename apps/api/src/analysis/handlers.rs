//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::analysis::scoring::BudgetPolicy;
use crate::analysis::skill_budget::{
    allocate_skill_budget, score_vacancy_skills, RawSkillScores, SkillBudget,
};
use crate::analysis::{analyze, render_summary, AnalysisError, AnalysisOptions, CoverageReport};
use crate::errors::AppError;
use crate::state::AppState;
use crate::taxonomy::Taxonomy;
use crate::vacancy::StructuredVacancy;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub vacancy: StructuredVacancy,
    /// Inline taxonomy `{name: {"IM", "LV"}}`. An explicit `null` is rejected.
    #[serde(default, deserialize_with = "present")]
    pub taxonomy: Option<Value>,
    /// Knowledge areas of a loaded occupation, used when no inline taxonomy is given.
    pub occupation_code: Option<String>,
    pub top_k: Option<usize>,
    pub policy: Option<BudgetPolicy>,
}

/// Keeps a present-but-null field as `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub occupation_code: Option<String>,
    pub report: CoverageReport,
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillBudgetRequest {
    pub scores: RawSkillScores,
    pub policy: Option<BudgetPolicy>,
}

#[derive(Debug, Deserialize)]
pub struct SkillScoreRequest {
    pub vacancy: StructuredVacancy,
    /// Defaults to the vacancy's own title.
    pub job_title: Option<String>,
    pub policy: Option<BudgetPolicy>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis
///
/// Matches a structured vacancy against a taxonomy and allocates both 100-point budgets.
/// The taxonomy is either inline or looked up by occupation code (unknown codes analyze
/// against an empty taxonomy).
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let defaults = state.config.analysis_options();
    let options = AnalysisOptions {
        top_k: request.top_k.unwrap_or(defaults.top_k),
        policy: request.policy.unwrap_or(defaults.policy),
    };
    if options.top_k == 0 {
        return Err(AppError::Validation("top_k must be at least 1".to_string()));
    }

    let inline;
    let taxonomy: &Taxonomy = match (&request.taxonomy, &request.occupation_code) {
        (Some(value), _) => {
            inline = Taxonomy::from_value(value).map_err(AnalysisError::from)?;
            &inline
        }
        (None, Some(code)) => state.taxonomy.knowledge(code),
        (None, None) => {
            return Err(AppError::Validation(
                "either taxonomy or occupation_code is required".to_string(),
            ))
        }
    };

    let report = analyze(&request.vacancy, taxonomy, &state.terms, &options);
    let summary = render_summary(&report);

    info!(
        "Analysis: {} requirements, {} matched, coverage {:.1}%",
        report.requirements.len(),
        report.matches.len(),
        report.coverage_percentage
    );

    Ok(Json(AnalysisResponse {
        analysis_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        occupation_code: request.occupation_code,
        report,
        summary,
    }))
}

/// POST /api/v1/skills/budget
///
/// Normalizes caller-supplied raw skill scores to the 200-point budget.
pub async fn handle_skill_budget(
    State(state): State<AppState>,
    Json(request): Json<SkillBudgetRequest>,
) -> Json<SkillBudget> {
    let policy = request.policy.unwrap_or(state.config.budget_policy);
    Json(allocate_skill_budget(&request.scores, policy))
}

/// POST /api/v1/skills/score
///
/// Asks the scoring oracle to distribute 200 points over the vacancy's skills, with
/// fixed-point fallback scoring when the oracle fails.
pub async fn handle_skill_score(
    State(state): State<AppState>,
    Json(request): Json<SkillScoreRequest>,
) -> Result<Json<SkillBudget>, AppError> {
    let job_title = request
        .job_title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| request.vacancy.job_title())
        .ok_or_else(|| {
            AppError::Validation("job_title is required when the vacancy has no title".to_string())
        })?;

    let budget = score_vacancy_skills(
        state.oracle.as_ref(),
        state.config.oracle_timeout,
        &job_title,
        &request.vacancy,
        request.policy.unwrap_or(state.config.budget_policy),
    )
    .await?;

    Ok(Json(budget))
}
