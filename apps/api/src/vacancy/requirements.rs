//! Requirement extraction — flattens a structured vacancy into ordered "field: value" items.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vacancy::{field_text, StructuredVacancy};

/// Field name given to every responsibility line.
pub const RESPONSIBILITY_FIELD: &str = "Обязанность";

/// Additional-info key that carries contact details, never a requirement.
pub const CONTACT_INFO_KEY: &str = "Контактная информация";

/// One requirement line of a vacancy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequirementItem {
    pub field_name: String,
    pub text: String,
}

impl RequirementItem {
    pub fn new(field_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for RequirementItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_name, self.text)
    }
}

/// Requirements first, then responsibilities, then additional info, each in source order.
pub fn extract_requirements(vacancy: &StructuredVacancy) -> Vec<RequirementItem> {
    let mut items = Vec::new();

    for (key, value) in &vacancy.requirements {
        if let Some(text) = field_text(value) {
            items.push(RequirementItem::new(key.clone(), text));
        }
    }

    for value in &vacancy.responsibilities {
        if let Some(text) = field_text(value) {
            items.push(RequirementItem::new(RESPONSIBILITY_FIELD, text));
        }
    }

    for (key, value) in &vacancy.additional_info {
        if key == CONTACT_INFO_KEY {
            continue;
        }
        if let Some(text) = field_text(value) {
            items.push(RequirementItem::new(key.clone(), text));
        }
    }

    items
}
