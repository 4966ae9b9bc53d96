pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{analysis, classification, intake, taxonomy};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis", post(analysis::handlers::handle_analyze))
        .route(
            "/api/v1/skills/budget",
            post(analysis::handlers::handle_skill_budget),
        )
        .route(
            "/api/v1/skills/score",
            post(analysis::handlers::handle_skill_score),
        )
        // Classification API
        .route(
            "/api/v1/classify",
            post(classification::handlers::handle_classify),
        )
        .route("/api/v1/zones", get(classification::handlers::handle_list_zones))
        // Intake API
        .route("/api/v1/intake", post(intake::handlers::handle_intake))
        // Taxonomy API
        .route(
            "/api/v1/occupations/:code/taxonomy",
            get(taxonomy::handlers::handle_get_taxonomy),
        )
        .with_state(state)
}
