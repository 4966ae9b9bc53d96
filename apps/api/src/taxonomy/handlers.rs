//! Axum route handlers for the Taxonomy API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::taxonomy::occupations::{JobZone, Occupation};
use crate::taxonomy::OccupationTaxonomy;

#[derive(Debug, Serialize)]
pub struct OccupationTaxonomyResponse {
    pub code: String,
    /// Present when the occupation is in the catalog.
    pub occupation: Option<Occupation>,
    pub zone: Option<JobZone>,
    #[serde(flatten)]
    pub taxonomy: OccupationTaxonomy,
}

/// GET /api/v1/occupations/:code/taxonomy
///
/// Knowledge areas and skills of one occupation.
pub async fn handle_get_taxonomy(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<OccupationTaxonomyResponse>, AppError> {
    let taxonomy = state
        .taxonomy
        .get(&code)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("No taxonomy for occupation '{code}'")))?;

    let found = state.catalog.find_by_code(&code);

    Ok(Json(OccupationTaxonomyResponse {
        occupation: found.map(|(_, o)| o.clone()),
        zone: found.map(|(zone, _)| zone),
        code,
        taxonomy,
    }))
}
