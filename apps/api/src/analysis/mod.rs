//! Analysis — requirement-to-taxonomy matching and point allocation.
//!
//! Pipeline (pure and deterministic):
//! 1. extract requirement lines from the structured vacancy
//! 2. match each line against the occupation's taxonomy through the term index
//! 3. allocate the knowledge budget over the top-K categories
//! 4. allocate the unmatched budget over requirements nothing matched
//! 5. aggregate into a [`CoverageReport`]

pub mod handlers;
pub mod matcher;
pub mod report;
pub mod scoring;
pub mod skill_budget;

use thiserror::Error;

use crate::analysis::matcher::{missing_important_categories, Matcher};
use crate::analysis::report::coverage_percentage;
use crate::analysis::scoring::{
    allocate_knowledge_scores, allocate_unmatched_scores, top_categories, BudgetPolicy,
    DEFAULT_TOP_K,
};
use crate::taxonomy::terms::TermIndex;
use crate::taxonomy::{DataError, Taxonomy};
use crate::vacancy::requirements::extract_requirements;
use crate::vacancy::StructuredVacancy;

pub use report::{render_summary, CoverageReport};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DataError),

    #[error("the vacancy has no requirements")]
    NoRequirements,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub top_k: usize,
    pub policy: BudgetPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            policy: BudgetPolicy::default(),
        }
    }
}

/// Runs the full analysis for one vacancy against one occupation's taxonomy.
///
/// An empty taxonomy is not an error: nothing matches and coverage is zero.
pub fn analyze(
    vacancy: &StructuredVacancy,
    taxonomy: &Taxonomy,
    terms: &TermIndex,
    options: &AnalysisOptions,
) -> CoverageReport {
    let requirements = extract_requirements(vacancy);
    let matches = Matcher::new(terms).match_requirements(&requirements, taxonomy);

    let missing = missing_important_categories(&matches, taxonomy);
    let top = top_categories(taxonomy, options.top_k);
    let knowledge_scores = allocate_knowledge_scores(&top, options.policy);

    let unmatched = matches.unmatched_requirements();
    let unmatched_scores = allocate_unmatched_scores(&unmatched, options.policy);

    let coverage = coverage_percentage(matches.matched_categories().len(), taxonomy.len());

    CoverageReport {
        requirements,
        matches: matches.matched().cloned().collect(),
        missing_important_categories: missing,
        top_categories: top,
        knowledge_scores,
        unmatched_requirements: unmatched,
        unmatched_scores,
        coverage_percentage: coverage,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::TaxonomyCategory;
    use serde_json::json;

    fn vacancy(value: serde_json::Value) -> StructuredVacancy {
        serde_json::from_value(value).unwrap()
    }

    fn taxonomy(items: &[(&str, f64)]) -> Taxonomy {
        Taxonomy::new(
            items
                .iter()
                .map(|(name, im)| TaxonomyCategory::new(*name, *im, None))
                .collect(),
        )
    }

    #[test]
    fn test_python_django_example() {
        let vacancy = vacancy(json!({
            "requirements": {"Технические навыки": "Python, Django"}
        }));
        let tax = taxonomy(&[("Programming", 4.5), ("Administration and Management", 2.0)]);

        let report = analyze(&vacancy, &tax, &TermIndex::builtin(), &AnalysisOptions::default());

        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].categories, vec!["Programming"]);
        assert!(report.unmatched_requirements.is_empty());
        assert!(report.unmatched_scores.is_empty());

        let programming = report.knowledge_scores.get("Programming").unwrap();
        let admin = report
            .knowledge_scores
            .get("Administration and Management")
            .unwrap();
        assert!(admin > programming);
        assert_eq!(report.coverage_percentage, 50.0);
        // Administration and Management is below the importance threshold
        assert!(report.missing_important_categories.is_empty());
    }

    #[test]
    fn test_unmatched_requirements_share_the_budget() {
        let vacancy = vacancy(json!({
            "requirements": {
                "Опыт работы": "от 2 лет",
                "Возраст": "от 21",
                "График": "полный день"
            }
        }));
        let report = analyze(
            &vacancy,
            &taxonomy(&[("Programming", 4.5)]),
            &TermIndex::builtin(),
            &AnalysisOptions::default(),
        );

        assert_eq!(report.unmatched_requirements.len(), 3);
        assert!(report.unmatched_scores.iter().all(|e| e.points == 33.3));
        assert_eq!(report.coverage_percentage, 0.0);
        assert_eq!(report.missing_important_categories.len(), 1);
    }

    #[test]
    fn test_empty_taxonomy_gives_zero_coverage() {
        let vacancy = vacancy(json!({
            "requirements": {"Технические навыки": "Python"}
        }));
        let report = analyze(
            &vacancy,
            &Taxonomy::default(),
            &TermIndex::builtin(),
            &AnalysisOptions::default(),
        );
        assert_eq!(report.coverage_percentage, 0.0);
        assert!(report.knowledge_scores.is_empty());
        assert!(report.top_categories.is_empty());
        assert_eq!(report.unmatched_requirements.len(), 1);
        assert_eq!(report.unmatched_scores.get("Технические навыки: Python"), Some(100.0));
    }

    #[test]
    fn test_top_k_limits_knowledge_budget() {
        let tax = taxonomy(&[
            ("A", 4.9),
            ("B", 4.4),
            ("C", 3.7),
            ("D", 3.3),
            ("E", 2.1),
            ("F", 1.1),
        ]);
        let options = AnalysisOptions {
            top_k: 3,
            policy: BudgetPolicy::Exact,
        };
        let report = analyze(
            &StructuredVacancy::default(),
            &tax,
            &TermIndex::builtin(),
            &options,
        );
        assert_eq!(report.knowledge_scores.len(), 3);
        assert!((report.knowledge_scores.total() - 100.0).abs() < 1e-9);
        assert!(report.requirements.is_empty());
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let vacancy = vacancy(json!({
            "requirements": {
                "Технические навыки": "Python, PostgreSQL, Docker",
                "Иностранные языки": "английский B2",
                "Опыт работы": "3 года"
            },
            "responsibilities": ["Разработка REST API", "Код-ревью"]
        }));
        let tax = taxonomy(&[
            ("Computers and Electronics", 4.7),
            ("Programming", 4.2),
            ("English Language", 3.6),
            ("Mathematics", 3.2),
            ("Customer and Personal Service", 3.2),
        ]);
        let terms = TermIndex::builtin();
        let options = AnalysisOptions::default();

        let run = || serde_json::to_string(&analyze(&vacancy, &tax, &terms, &options)).unwrap();
        assert_eq!(run(), run());
    }

    #[test]
    fn test_summary_mentions_every_group() {
        let vacancy = vacancy(json!({
            "requirements": {
                "Технические навыки": "Python",
                "Возраст": "от 21"
            }
        }));
        let tax = taxonomy(&[("Programming", 4.5), ("Mathematics", 3.9)]);
        let report = analyze(&vacancy, &tax, &TermIndex::builtin(), &AnalysisOptions::default());
        let summary = render_summary(&report);

        assert!(summary.contains("Knowledge coverage: 50.0%"));
        assert!(summary.contains("SCORE GROUP 1"));
        assert!(summary.contains("Возраст: от 21: 100 points"));
        assert!(summary.contains("-> Programming"));
        assert!(summary.contains("* Mathematics (importance: 3.9/5.0"));
    }
}
