use std::sync::Arc;

use crate::config::Config;
use crate::intake::IntakePipeline;
use crate::oracle::ClassificationOracle;
use crate::taxonomy::occupations::OccupationCatalog;
use crate::taxonomy::terms::TermIndex;
use crate::taxonomy::TaxonomyStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every table is loaded once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub taxonomy: Arc<TaxonomyStore>,
    pub catalog: Arc<OccupationCatalog>,
    pub terms: Arc<TermIndex>,
    /// Pluggable oracle. `LlmOracle` when an API key is configured, `UnavailableOracle` otherwise.
    pub oracle: Arc<dyn ClassificationOracle>,
    pub pipeline: Arc<IntakePipeline>,
}

impl AppState {
    pub fn new(
        config: Config,
        taxonomy: TaxonomyStore,
        catalog: OccupationCatalog,
        terms: TermIndex,
        oracle: Arc<dyn ClassificationOracle>,
    ) -> Self {
        let taxonomy = Arc::new(taxonomy);
        let catalog = Arc::new(catalog);
        let terms = Arc::new(terms);

        let pipeline = Arc::new(IntakePipeline::new(
            oracle.clone(),
            config.oracle_timeout,
            config.fallback_seed,
            catalog.clone(),
            taxonomy.clone(),
            terms.clone(),
            config.analysis_options(),
        ));

        Self {
            config,
            taxonomy,
            catalog,
            terms,
            oracle,
            pipeline,
        }
    }
}
