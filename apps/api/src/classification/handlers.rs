//! Axum route handlers for the Classification API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::classification::Classification;
use crate::errors::AppError;
use crate::state::AppState;
use crate::taxonomy::occupations::ZoneProfile;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub description: String,
}

/// POST /api/v1/classify
///
/// Classifies a role description into a zone and selects an occupation within it.
pub async fn handle_classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<Classification>, AppError> {
    if request.description.trim().is_empty() {
        return Err(AppError::Validation("description cannot be empty".to_string()));
    }

    Ok(Json(state.pipeline.classify(request.description.trim()).await))
}

/// GET /api/v1/zones
pub async fn handle_list_zones(State(state): State<AppState>) -> Json<Vec<ZoneProfile>> {
    Json(state.catalog.profiles().to_vec())
}
