//! Taxonomy Store — per-occupation knowledge and skill categories with importance/level ratings.
//!
//! Loaded once at startup from the occupational data set and shared read-only behind an `Arc`.
//! Unknown occupation codes resolve to an empty taxonomy (zero coverage, never an error).

pub mod handlers;
pub mod occupations;
pub mod terms;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

/// Upper bound of the importance and level scales.
pub const MAX_RATING: f64 = 5.0;

/// Errors raised while loading or validating data tables and inline taxonomies.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context} must be a JSON object, found {found}")]
    NotAnObject { context: String, found: &'static str },

    #[error("invalid job zone '{0}' (expected 1-5)")]
    InvalidZone(String),

    #[error("zone profiles must cover zones 1-5 exactly once, found [{0}]")]
    IncompleteZoneProfiles(String),
}

/// Reads and parses a JSON data file, attaching the path to any failure.
pub(crate) fn read_json_file(path: &Path) -> Result<Value, DataError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DataError::Json {
        path: display,
        source,
    })
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub(crate) fn expect_object<'a>(
    value: &'a Value,
    context: &str,
) -> Result<&'a Map<String, Value>, DataError> {
    value.as_object().ok_or_else(|| DataError::NotAnObject {
        context: context.to_string(),
        found: json_kind(value),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Categories
// ────────────────────────────────────────────────────────────────────────────

/// A named competence dimension of an occupation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyCategory {
    pub name: String,
    /// Importance rating (IM), 0.0 – 5.0
    pub importance: f64,
    /// Proficiency level rating (LV), 0.0 – 5.0, when the data set provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,
}

impl TaxonomyCategory {
    pub fn new(name: impl Into<String>, importance: f64, level: Option<f64>) -> Self {
        Self {
            name: name.into(),
            importance: clamp_rating(importance),
            level: level.map(clamp_rating),
        }
    }

    /// Builds a category from a raw rating value: either `{"IM": f, "LV": f}` or a bare number.
    /// Returns `None` when no importance rating is present.
    fn from_ratings(name: &str, data: &Value) -> Option<Self> {
        match data {
            Value::Object(scales) => {
                let importance = scales.get("IM").and_then(Value::as_f64)?;
                let level = scales.get("LV").and_then(Value::as_f64);
                Some(Self::new(name, importance, level))
            }
            Value::Number(n) => n.as_f64().map(|importance| Self::new(name, importance, None)),
            _ => None,
        }
    }
}

fn clamp_rating(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_RATING)
    }
}

/// The categories of a single occupation, in data-set order.
///
/// Order matters: ranking ties are broken by it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    categories: Vec<TaxonomyCategory>,
}

static EMPTY_TAXONOMY: Taxonomy = Taxonomy {
    categories: Vec::new(),
};

impl Taxonomy {
    /// Builds a taxonomy, keeping the first occurrence of any duplicated name.
    pub fn new(categories: Vec<TaxonomyCategory>) -> Self {
        let mut seen = HashSet::new();
        let categories = categories
            .into_iter()
            .filter(|c| seen.insert(c.name.clone()))
            .collect();
        Self { categories }
    }

    /// Parses an inline taxonomy object `{name: {"IM": .., "LV": ..} | number}`.
    ///
    /// Anything other than a JSON object (including `null`) is structurally invalid.
    /// Entries without an importance rating are skipped.
    pub fn from_value(value: &Value) -> Result<Self, DataError> {
        let object = expect_object(value, "taxonomy")?;
        Ok(Self::from_object(object))
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        Self::new(
            object
                .iter()
                .filter_map(|(name, data)| TaxonomyCategory::from_ratings(name, data))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxonomyCategory> {
        self.categories.iter()
    }

    pub fn get(&self, name: &str) -> Option<&TaxonomyCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<'a> IntoIterator for &'a Taxonomy {
    type Item = &'a TaxonomyCategory;
    type IntoIter = std::slice::Iter<'a, TaxonomyCategory>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

/// Knowledge areas and skills of one occupation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupationTaxonomy {
    pub knowledge: Taxonomy,
    pub skills: Taxonomy,
}

/// Immutable table of taxonomies keyed by occupation code.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyStore {
    occupations: HashMap<String, OccupationTaxonomy>,
}

impl TaxonomyStore {
    /// Loads the store from a JSON file shaped
    /// `{code: {"knowledge": {name: {"IM", "LV"}}, "skills": {...}}}`.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let value = read_json_file(path)?;
        let store = Self::from_value(&value)?;
        info!(
            "Loaded taxonomy for {} occupations from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn from_value(value: &Value) -> Result<Self, DataError> {
        let root = expect_object(value, "taxonomy data set")?;
        let mut occupations = HashMap::with_capacity(root.len());

        for (code, profile) in root {
            let profile = expect_object(profile, &format!("occupation '{code}'"))?;
            let section = |key: &str| -> Result<Taxonomy, DataError> {
                match profile.get(key) {
                    None | Some(Value::Null) => Ok(Taxonomy::default()),
                    Some(v) => Ok(Taxonomy::from_object(expect_object(
                        v,
                        &format!("occupation '{code}' {key}"),
                    )?)),
                }
            };
            occupations.insert(
                code.clone(),
                OccupationTaxonomy {
                    knowledge: section("knowledge")?,
                    skills: section("skills")?,
                },
            );
        }

        Ok(Self { occupations })
    }

    pub fn from_occupations(occupations: HashMap<String, OccupationTaxonomy>) -> Self {
        Self { occupations }
    }

    pub fn get(&self, code: &str) -> Option<&OccupationTaxonomy> {
        self.occupations.get(code)
    }

    /// Knowledge areas for an occupation; empty for unknown codes.
    pub fn knowledge(&self, code: &str) -> &Taxonomy {
        self.get(code)
            .map(|o| &o.knowledge)
            .unwrap_or(&EMPTY_TAXONOMY)
    }

    pub fn len(&self) -> usize {
        self.occupations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_taxonomy_preserves_source_order() {
        let taxonomy = Taxonomy::from_value(&json!({
            "Programming": {"IM": 4.5, "LV": 4.8},
            "Administration and Management": {"IM": 2.0},
            "Mathematics": 3.1
        }))
        .unwrap();

        let names: Vec<&str> = taxonomy.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Programming", "Administration and Management", "Mathematics"]
        );
        assert_eq!(taxonomy.get("Programming").unwrap().level, Some(4.8));
        assert_eq!(taxonomy.get("Mathematics").unwrap().level, None);
    }

    #[test]
    fn test_entries_without_importance_are_skipped() {
        let taxonomy = Taxonomy::from_value(&json!({
            "Programming": {"LV": 4.8},
            "Design": "high",
            "Clerical": {"IM": 1.5}
        }))
        .unwrap();
        assert_eq!(taxonomy.len(), 1);
        assert!(taxonomy.contains("Clerical"));
    }

    #[test]
    fn test_ratings_are_clamped() {
        let taxonomy = Taxonomy::from_value(&json!({"A": {"IM": 7.2, "LV": -1.0}})).unwrap();
        let a = taxonomy.get("A").unwrap();
        assert_eq!(a.importance, 5.0);
        assert_eq!(a.level, Some(0.0));
    }

    #[test]
    fn test_null_taxonomy_is_rejected() {
        let err = Taxonomy::from_value(&Value::Null).unwrap_err();
        assert!(matches!(err, DataError::NotAnObject { found: "null", .. }));
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let taxonomy = Taxonomy::new(vec![
            TaxonomyCategory::new("A", 4.0, None),
            TaxonomyCategory::new("A", 1.0, None),
        ]);
        assert_eq!(taxonomy.len(), 1);
        assert_eq!(taxonomy.get("A").unwrap().importance, 4.0);
    }

    #[test]
    fn test_unknown_code_yields_empty_taxonomy() {
        let store = TaxonomyStore::default();
        assert!(store.knowledge("15-1252.00").is_empty());
    }

    #[test]
    fn test_store_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "15-1252.00": {{
                    "knowledge": {{"Computers and Electronics": {{"IM": 4.7, "LV": 5.1}}}},
                    "skills": {{"Programming": {{"IM": 4.1}}}}
                }},
                "35-3031.00": {{"knowledge": null}}
            }}"#
        )
        .unwrap();

        let store = TaxonomyStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        let dev = store.get("15-1252.00").unwrap();
        assert_eq!(dev.knowledge.len(), 1);
        assert_eq!(dev.skills.len(), 1);
        assert!(store.knowledge("35-3031.00").is_empty());
    }

    #[test]
    fn test_store_load_reports_missing_file() {
        let err = TaxonomyStore::load(Path::new("/nonexistent/knowledge_skills.json")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
