//! Skill budget — normalizes per-item skill scores to a 200-point budget.
//!
//! Raw scores come from the scoring oracle (integers 5–50 per item across five
//! sub-categories). When their sum is not 200 every item is rescaled by `200 / sum`
//! and rounded; the reported `total_score` is always 200, with the actual sum of the
//! rescaled values reported next to it.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{info, warn};

use crate::analysis::scoring::{apportion, BudgetPolicy};
use crate::analysis::AnalysisError;
use crate::oracle::{bounded, ClassificationOracle};
use crate::vacancy::{field_text, StructuredVacancy};

pub const SKILL_BUDGET: u32 = 200;

const TECHNICAL_SKILLS_FIELD: &str = "Технические навыки";
const LANGUAGES_FIELD: &str = "Языки программирования";
const TOOLS_FIELD: &str = "Инструменты";

const FALLBACK_TECHNICAL_POINTS: u32 = 20;
const FALLBACK_LANGUAGE_POINTS: u32 = 25;
const FALLBACK_TOOL_POINTS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    TechnicalSkills,
    ProgrammingLanguages,
    Tools,
    SoftSkills,
    DomainKnowledge,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 5] = [
        SkillCategory::TechnicalSkills,
        SkillCategory::ProgrammingLanguages,
        SkillCategory::Tools,
        SkillCategory::SoftSkills,
        SkillCategory::DomainKnowledge,
    ];
}

/// Points per item within one sub-category, in the order the items were supplied.
///
/// Serialized as a JSON object. On input any non-negative number is accepted and rounded,
/// since models often write whole points as `40.0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillItems(Vec<(String, u32)>);

impl SkillItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the points of `name`, keeping its original position when already present.
    pub fn insert(&mut self, name: impl Into<String>, points: u32) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = points,
            None => self.0.push((name, points)),
        }
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, v)| u64::from(*v)).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for SkillItems {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut items = Self::new();
        for (name, points) in iter {
            items.insert(name, points);
        }
        items
    }
}

impl<S: Into<String>, const N: usize> From<[(S, u32); N]> for SkillItems {
    fn from(entries: [(S, u32); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl Serialize for SkillItems {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, points) in &self.0 {
            map.serialize_entry(name, points)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillItems {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ItemsVisitor;

        impl<'de> Visitor<'de> for ItemsVisitor {
            type Value = SkillItems;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of skill names to non-negative points")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SkillItems, A::Error> {
                let mut items = SkillItems::new();
                while let Some((name, points)) = access.next_entry::<String, f64>()? {
                    if !points.is_finite() || points < 0.0 || points > f64::from(u32::MAX) {
                        return Err(de::Error::custom(format!(
                            "invalid points {points} for skill '{name}'"
                        )));
                    }
                    items.insert(name, points.round() as u32);
                }
                Ok(items)
            }
        }

        deserializer.deserialize_map(ItemsVisitor)
    }
}

/// Points per item, per sub-category.
pub type RawSkillScores = BTreeMap<SkillCategory, SkillItems>;

/// Where the raw scores came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Oracle,
    Fallback,
    Supplied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBudget {
    pub categories: RawSkillScores,
    /// Always [`SKILL_BUDGET`].
    pub total_score: u32,
    /// Actual sum of the reported item scores.
    pub allocated_sum: u32,
    /// `200 / raw_sum` when a rescale was applied.
    pub multiplier: Option<f64>,
    pub analysis_summary: Option<String>,
    pub source: ScoreSource,
}

/// Normalizes raw scores to the 200-point budget.
///
/// A zero raw sum is left as is. Every sub-category is present in the output.
pub fn allocate_skill_budget(raw: &RawSkillScores, policy: BudgetPolicy) -> SkillBudget {
    let raw_sum: u64 = raw.values().map(SkillItems::total).sum();

    let mut categories: RawSkillScores = SkillCategory::ALL
        .iter()
        .map(|c| (*c, SkillItems::new()))
        .collect();
    let mut multiplier = None;

    if raw_sum == 0 || raw_sum == u64::from(SKILL_BUDGET) {
        for (category, items) in raw {
            categories.insert(*category, items.clone());
        }
    } else {
        let factor = f64::from(SKILL_BUDGET) / raw_sum as f64;
        multiplier = Some(factor);

        let flat: Vec<(SkillCategory, &str, u32)> = raw
            .iter()
            .flat_map(|(c, items)| items.iter().map(move |(name, v)| (*c, name, v)))
            .collect();

        let rescaled: Vec<u32> = match policy {
            BudgetPolicy::Nominal => flat
                .iter()
                .map(|(_, _, v)| (f64::from(*v) * factor).round() as u32)
                .collect(),
            BudgetPolicy::Exact => {
                let shares: Vec<f64> = flat.iter().map(|(_, _, v)| f64::from(*v)).collect();
                apportion(&shares, f64::from(SKILL_BUDGET), 0, BudgetPolicy::Exact)
                    .into_iter()
                    .map(|v| v as u32)
                    .collect()
            }
        };

        for ((category, name, _), points) in flat.into_iter().zip(rescaled) {
            categories.entry(category).or_default().insert(name, points);
        }
    }

    let allocated_sum = categories.values().map(SkillItems::total).sum::<u64>();

    SkillBudget {
        categories,
        total_score: SKILL_BUDGET,
        allocated_sum: u32::try_from(allocated_sum).unwrap_or(u32::MAX),
        multiplier,
        analysis_summary: None,
        source: ScoreSource::Supplied,
    }
}

/// `"key: value"` lines of the vacancy's requirement group, or `None` when it has no
/// requirement group at all.
pub fn requirements_text(vacancy: &StructuredVacancy) -> Option<String> {
    if vacancy.requirements.is_empty() {
        return None;
    }
    let lines: Vec<String> = vacancy
        .requirements
        .iter()
        .filter_map(|(key, value)| field_text(value).map(|text| format!("{key}: {text}")))
        .collect();
    Some(lines.join("\n"))
}

/// Fixed-point scoring used when the oracle is unavailable: comma/semicolon separated
/// technical skills, programming languages and tools at fixed points each.
pub fn fallback_skill_scores(vacancy: &StructuredVacancy) -> RawSkillScores {
    let split_field = |field: &str, points: u32| -> SkillItems {
        vacancy
            .requirements
            .get(field)
            .and_then(field_text)
            .map(|text| {
                text.split(|c: char| c == ',' || c == ';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| (s, points))
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut raw = RawSkillScores::new();
    raw.insert(
        SkillCategory::TechnicalSkills,
        split_field(TECHNICAL_SKILLS_FIELD, FALLBACK_TECHNICAL_POINTS),
    );
    raw.insert(
        SkillCategory::ProgrammingLanguages,
        split_field(LANGUAGES_FIELD, FALLBACK_LANGUAGE_POINTS),
    );
    raw.insert(
        SkillCategory::Tools,
        split_field(TOOLS_FIELD, FALLBACK_TOOL_POINTS),
    );
    raw
}

/// Asks the oracle to distribute the skill budget for a vacancy, falling back to fixed-point
/// scoring on any oracle failure. Errors only when the vacancy has no requirement group.
pub async fn score_vacancy_skills(
    oracle: &dyn ClassificationOracle,
    timeout: Duration,
    job_title: &str,
    vacancy: &StructuredVacancy,
    policy: BudgetPolicy,
) -> Result<SkillBudget, AnalysisError> {
    let text = requirements_text(vacancy).ok_or(AnalysisError::NoRequirements)?;

    match bounded(timeout, oracle.score_skills(job_title, &text)).await {
        Ok(scores) => {
            let (raw, summary) = scores.into_parts();
            let mut budget = allocate_skill_budget(&raw, policy);
            budget.source = ScoreSource::Oracle;
            budget.analysis_summary = summary;
            info!(
                "Skill budget for '{job_title}': {} items, allocated_sum={}",
                raw.values().map(SkillItems::len).sum::<usize>(),
                budget.allocated_sum
            );
            Ok(budget)
        }
        Err(e) => {
            warn!("Skill scoring oracle failed, using fallback scoring: {e}");
            let mut budget = allocate_skill_budget(&fallback_skill_scores(vacancy), policy);
            budget.source = ScoreSource::Fallback;
            budget.analysis_summary =
                Some("Fixed-point distribution (scoring oracle unavailable)".to_string());
            Ok(budget)
        }
    }
}
