//! Structured vacancy record — the language model's structuring of an uploaded vacancy.
//!
//! Field groups and their keys are produced upstream in Russian; the engine only reads them.
//! Every group is optional: a missing or `null` group deserializes as empty.

pub mod requirements;
pub mod salary;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Placeholder written by the structuring step when a field is absent from the vacancy.
pub const NOT_SPECIFIED: &str = "Не указано";

pub const TITLE_KEY: &str = "Название должности";
pub const LEVEL_KEY: &str = "Уровень";
pub const EXPERIENCE_KEY: &str = "Опыт работы";
pub const EDUCATION_KEY: &str = "Образование";

/// Field groups of a structured vacancy. Object groups keep their source key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredVacancy {
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_info: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub salary: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responsibilities: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub benefits: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_info: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_info: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_info: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Renders a field value as requirement text.
///
/// Returns `None` for empty values and the "not specified" placeholder. Arrays are joined
/// with ", ".
pub fn field_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(field_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(_) => value.to_string(),
    };

    (!text.is_empty() && text != NOT_SPECIFIED).then_some(text)
}

impl StructuredVacancy {
    pub fn job_title(&self) -> Option<String> {
        self.job_info.get(TITLE_KEY).and_then(field_text)
    }

    /// A compact free-text description used for zone classification when the caller
    /// supplies none: title, level, experience, education, then the requirement lines.
    pub fn classification_text(&self) -> String {
        let mut lines = Vec::new();
        for key in [TITLE_KEY, LEVEL_KEY, EXPERIENCE_KEY, EDUCATION_KEY] {
            if let Some(text) = self.job_info.get(key).and_then(field_text) {
                lines.push(format!("{key}: {text}"));
            }
        }
        lines.extend(
            requirements::extract_requirements(self)
                .iter()
                .map(|r| r.to_string()),
        );
        lines.join("\n")
    }
}
