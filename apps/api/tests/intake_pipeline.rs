//! End-to-end run of the intake pipeline over data files on disk.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tempfile::NamedTempFile;

use vacancy_api::analysis::scoring::BudgetPolicy;
use vacancy_api::analysis::skill_budget::{ScoreSource, SkillCategory};
use vacancy_api::analysis::AnalysisOptions;
use vacancy_api::classification::{TitleResolution, ZoneSource};
use vacancy_api::intake::IntakePipeline;
use vacancy_api::oracle::{ClassificationOracle, OracleError, OracleSkillScores};
use vacancy_api::taxonomy::occupations::{JobZone, OccupationCatalog};
use vacancy_api::taxonomy::terms::TermIndex;
use vacancy_api::taxonomy::TaxonomyStore;
use vacancy_api::vacancy::StructuredVacancy;

/// Answers like a well-behaved model; skill scoring sums to 150 to force a rescale.
struct CannedOracle;

#[async_trait]
impl ClassificationOracle for CannedOracle {
    async fn classify_zone(&self, _description: &str) -> Result<String, OracleError> {
        Ok("Zone 4".to_string())
    }

    async fn select_title(
        &self,
        _zone: JobZone,
        _description: &str,
        titles: &[String],
    ) -> Result<String, OracleError> {
        assert!(titles.iter().any(|t| t == "Software Developers"));
        Ok("software developers".to_string())
    }

    async fn score_skills(
        &self,
        _job_title: &str,
        requirements_text: &str,
    ) -> Result<OracleSkillScores, OracleError> {
        assert!(requirements_text.contains("Технические навыки: Python, PostgreSQL"));
        Ok(OracleSkillScores {
            programming_languages: [("Python".to_string(), 45)].into(),
            tools: [("PostgreSQL".to_string(), 30), ("Git".to_string(), 15)].into(),
            soft_skills: [("Teamwork".to_string(), 30)].into(),
            domain_knowledge: [("Banking".to_string(), 30)].into(),
            analysis_summary: Some("backend-heavy role".to_string()),
            ..Default::default()
        })
    }
}

fn json_file(value: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

fn pipeline(terms: TermIndex) -> (IntakePipeline, Vec<NamedTempFile>) {
    let taxonomy_file = json_file(json!({
        "15-1252.00": {
            "knowledge": {
                "Computers and Electronics": {"IM": 4.72, "LV": 5.9},
                "Programming": {"IM": 4.4, "LV": 5.1},
                "English Language": {"IM": 3.6},
                "Mathematics": {"IM": 3.2},
                "Customer and Personal Service": {"IM": 3.2},
                "Design": {"IM": 2.9},
                "Telecommunications": {"LV": 2.0}
            },
            "skills": {
                "Critical Thinking": {"IM": 4.0}
            }
        }
    }));
    let occupations_file = json_file(json!({
        "3": [{"code": "15-1232.00", "title": "Computer User Support Specialists"}],
        "4": [
            {"code": "15-1252.00", "title": "Software Developers", "description": "Design software"},
            {"code": "15-1254.00", "title": "Web Developers"}
        ]
    }));

    let store = TaxonomyStore::load(taxonomy_file.path()).unwrap();
    let catalog = OccupationCatalog::load(occupations_file.path()).unwrap();

    let pipeline = IntakePipeline::new(
        Arc::new(CannedOracle),
        Duration::from_secs(5),
        Some(1),
        Arc::new(catalog),
        Arc::new(store),
        Arc::new(terms),
        AnalysisOptions {
            top_k: 5,
            policy: BudgetPolicy::Nominal,
        },
    );
    (pipeline, vec![taxonomy_file, occupations_file])
}

fn vacancy() -> StructuredVacancy {
    serde_json::from_value(json!({
        "job_info": {
            "Название должности": "Backend-разработчик",
            "Уровень": "Middle"
        },
        "salary": {"Зарплата от": "180 000", "Зарплата до": "250 000", "Валюта": "RUB"},
        "requirements": {
            "Технические навыки": "Python, PostgreSQL",
            "Иностранные языки": "английский B1",
            "Опыт работы": "от 3 лет",
            "Образование": "Не указано"
        },
        "responsibilities": ["Разработка backend-модулей", "Участие в код-ревью"],
        "additional_info": {
            "Контактная информация": "hr@example.com",
            "Формат работы": "гибрид"
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn intake_runs_end_to_end_over_loaded_data() {
    let (pipeline, _files) = pipeline(TermIndex::builtin());
    let outcome = pipeline.run(None, &vacancy()).await;

    // classification
    let classification = &outcome.classification;
    assert_eq!(classification.zone.zone.get(), 4);
    assert_eq!(classification.zone.source, ZoneSource::Oracle);
    let selection = classification.selection.as_ref().unwrap();
    assert_eq!(selection.occupation.code, "15-1252.00");
    assert_eq!(selection.resolution, TitleResolution::Substring);

    // requirements: sentinel and contact details are excluded
    let report = &outcome.coverage;
    let lines: Vec<String> = report.requirements.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Технические навыки: Python, PostgreSQL",
            "Иностранные языки: английский B1",
            "Опыт работы: от 3 лет",
            "Обязанность: Разработка backend-модулей",
            "Обязанность: Участие в код-ревью",
            "Формат работы: гибрид",
        ]
    );

    // "Telecommunications" has no importance rating and is skipped on load: 6 categories
    // Computers and Electronics, Programming (python, postgresql, разработка), English Language
    assert!((report.coverage_percentage - 50.0).abs() < 1e-9);

    let missing: Vec<&str> = report
        .missing_important_categories
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(missing, vec!["Mathematics", "Customer and Personal Service"]);

    assert_eq!(report.knowledge_scores.len(), 5);
    assert!((report.knowledge_scores.total() - 100.0).abs() <= 0.5 + 1e-9);

    assert_eq!(report.unmatched_requirements.len(), 3);
    assert!(report.unmatched_scores.iter().all(|e| e.points == 33.3));

    // salary
    assert_eq!(outcome.salary.min, Some(180_000));
    assert_eq!(outcome.salary.max, Some(250_000));
    assert_eq!(outcome.salary.currency.as_deref(), Some("RUB"));

    // skill budget: 150 raw points rescaled to 200
    let budget = outcome.skill_budget.as_ref().unwrap();
    assert_eq!(budget.source, ScoreSource::Oracle);
    assert_eq!(budget.total_score, 200);
    assert_eq!(
        budget.categories[&SkillCategory::ProgrammingLanguages].get("Python"),
        Some(60)
    );
    assert_eq!(budget.categories[&SkillCategory::Tools].get("Git"), Some(20));
    assert!(budget.categories[&SkillCategory::TechnicalSkills].is_empty());

    assert!(outcome.summary.contains("Knowledge coverage: 50.0%"));
}

#[tokio::test]
async fn custom_term_index_changes_matching() {
    let terms_file = json_file(json!({
        "гибрид": ["Customer and Personal Service"],
        "Python": "Programming"
    }));
    let terms = TermIndex::load(terms_file.path()).unwrap();
    let (pipeline, _files) = pipeline(terms);

    let outcome = pipeline.run(Some("Python backend developer"), &vacancy()).await;
    let report = &outcome.coverage;

    let matched: Vec<&str> = report
        .matches
        .iter()
        .flat_map(|m| m.categories.iter().map(String::as_str))
        .collect();
    assert_eq!(matched, vec!["Programming", "Customer and Personal Service"]);
    assert!((report.coverage_percentage - 100.0 * 2.0 / 6.0).abs() < 1e-9);
}

#[tokio::test]
async fn identical_runs_serialize_identically() {
    let (pipeline, _files) = pipeline(TermIndex::builtin());
    let first = serde_json::to_string(&pipeline.run(None, &vacancy()).await.coverage).unwrap();
    let second = serde_json::to_string(&pipeline.run(None, &vacancy()).await.coverage).unwrap();
    assert_eq!(first, second);
}
