use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the size of the loaded tables.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let oracle = match state.config.anthropic_api_key {
        Some(_) => "llm",
        None => "unavailable",
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "vacancy-api",
        "occupations": state.catalog.len(),
        "taxonomies": state.taxonomy.len(),
        "terms": state.terms.len(),
        "oracle": oracle,
    }))
}
