//! Intake pipeline — one vacancy end to end.
//!
//! Classify → Select → taxonomy lookup → Analyze, plus salary extraction and skill scoring.
//! Oracle failures never abort a run; each stage degrades to its fallback.

pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::analysis::skill_budget::{score_vacancy_skills, SkillBudget};
use crate::analysis::{analyze, render_summary, AnalysisOptions, CoverageReport};
use crate::classification::{Classification, TitleSelector, ZoneClassifier};
use crate::oracle::ClassificationOracle;
use crate::taxonomy::occupations::OccupationCatalog;
use crate::taxonomy::terms::TermIndex;
use crate::taxonomy::{Taxonomy, TaxonomyStore};
use crate::vacancy::salary::SalaryRange;
use crate::vacancy::StructuredVacancy;

#[derive(Debug, Clone, Serialize)]
pub struct IntakeOutcome {
    pub classification: Classification,
    pub coverage: CoverageReport,
    pub summary: String,
    pub salary: SalaryRange,
    /// `None` when the vacancy has no requirement group to score.
    pub skill_budget: Option<SkillBudget>,
}

pub struct IntakePipeline {
    classifier: ZoneClassifier,
    selector: TitleSelector,
    oracle: Arc<dyn ClassificationOracle>,
    timeout: Duration,
    catalog: Arc<OccupationCatalog>,
    taxonomy: Arc<TaxonomyStore>,
    terms: Arc<TermIndex>,
    options: AnalysisOptions,
}

impl IntakePipeline {
    pub fn new(
        oracle: Arc<dyn ClassificationOracle>,
        timeout: Duration,
        fallback_seed: Option<u64>,
        catalog: Arc<OccupationCatalog>,
        taxonomy: Arc<TaxonomyStore>,
        terms: Arc<TermIndex>,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            classifier: ZoneClassifier::new(oracle.clone(), timeout),
            selector: TitleSelector::new(oracle.clone(), timeout, fallback_seed),
            oracle,
            timeout,
            catalog,
            taxonomy,
            terms,
            options,
        }
    }

    /// Zone plus the occupation selected within it.
    pub async fn classify(&self, description: &str) -> Classification {
        let zone = self.classifier.classify(description).await;
        let candidates = self.catalog.candidates(zone.zone);
        let selection = self.selector.select(zone.zone, description, candidates).await;

        Classification {
            zone,
            profile: self.catalog.profile(zone.zone).clone(),
            selection,
        }
    }

    /// Runs the whole intake for one vacancy. Without a `description` the vacancy's own
    /// title and requirement lines are classified.
    pub async fn run(
        &self,
        description: Option<&str>,
        vacancy: &StructuredVacancy,
    ) -> IntakeOutcome {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| vacancy.classification_text());

        let classification = self.classify(&description).await;

        let empty = Taxonomy::default();
        let taxonomy = classification
            .occupation_code()
            .map(|code| self.taxonomy.knowledge(code))
            .unwrap_or(&empty);

        let coverage = analyze(vacancy, taxonomy, &self.terms, &self.options);
        let summary = render_summary(&coverage);
        let salary = SalaryRange::from_vacancy(vacancy);

        let job_title = classification
            .selection
            .as_ref()
            .map(|s| s.occupation.title.clone())
            .or_else(|| vacancy.job_title())
            .unwrap_or_default();
        let skill_budget = score_vacancy_skills(
            self.oracle.as_ref(),
            self.timeout,
            &job_title,
            vacancy,
            self.options.policy,
        )
        .await
        .ok();

        info!(
            "Intake finished: zone {}, occupation {:?}, coverage {:.1}%",
            classification.zone.zone,
            classification.occupation_code(),
            coverage.coverage_percentage
        );

        IntakeOutcome {
            classification,
            coverage,
            summary,
            salary,
            skill_budget,
        }
    }
}
