use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vacancy_api::config::Config;
use vacancy_api::llm_client::LlmClient;
use vacancy_api::oracle::{ClassificationOracle, LlmOracle, UnavailableOracle};
use vacancy_api::routes::build_router;
use vacancy_api::state::AppState;
use vacancy_api::taxonomy::occupations::OccupationCatalog;
use vacancy_api::taxonomy::terms::TermIndex;
use vacancy_api::taxonomy::TaxonomyStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vacancy API v{}", env!("CARGO_PKG_VERSION"));

    // Load static tables
    let taxonomy = TaxonomyStore::load(&config.taxonomy_path).context("loading taxonomy")?;
    let mut catalog =
        OccupationCatalog::load(&config.occupations_path).context("loading occupations")?;
    if let Some(path) = &config.zone_profiles_path {
        let profiles = OccupationCatalog::load_profiles(path).context("loading zone profiles")?;
        catalog = catalog
            .with_profiles(profiles)
            .context("applying zone profiles")?;
    }
    let terms = match &config.term_index_path {
        Some(path) => TermIndex::load(path).context("loading term index")?,
        None => TermIndex::builtin(),
    };
    info!("Term index ready ({} terms)", terms.len());

    // Initialize the classification oracle
    let oracle: Arc<dyn ClassificationOracle> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.llm_model.clone(), config.oracle_timeout)
                .context("building LLM client")?;
            info!("LLM oracle initialized (model: {})", llm.model());
            Arc::new(LlmOracle::new(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set: classification and skill scoring use fallbacks");
            Arc::new(UnavailableOracle)
        }
    };

    info!(
        "Analysis defaults: top_k={}, budget_policy={}, oracle_timeout={}s",
        config.top_k,
        config.budget_policy,
        config.oracle_timeout.as_secs()
    );

    // Build app state
    let state = AppState::new(config.clone(), taxonomy, catalog, terms, oracle);

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
