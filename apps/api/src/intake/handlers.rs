//! Axum route handlers for the Intake API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::IntakeOutcome;
use crate::state::AppState;
use crate::vacancy::StructuredVacancy;

#[derive(Debug, Deserialize)]
pub struct IntakeRequest {
    /// Free-text role description for classification; derived from the vacancy when absent.
    pub description: Option<String>,
    pub vacancy: StructuredVacancy,
}

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub intake_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: IntakeOutcome,
}

/// POST /api/v1/intake
///
/// Full pipeline: classify → select occupation → analyze coverage → salary → skill budget.
pub async fn handle_intake(
    State(state): State<AppState>,
    Json(request): Json<IntakeRequest>,
) -> Result<Json<IntakeResponse>, AppError> {
    let has_description = request
        .description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if !has_description && request.vacancy.classification_text().is_empty() {
        return Err(AppError::Validation(
            "description is required when the vacancy has no title or requirements".to_string(),
        ));
    }

    let outcome = state
        .pipeline
        .run(request.description.as_deref(), &request.vacancy)
        .await;

    Ok(Json(IntakeResponse {
        intake_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        outcome,
    }))
}
