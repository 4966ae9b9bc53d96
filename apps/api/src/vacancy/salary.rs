//! Salary range extraction. Malformed values are omitted, never reported as errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::vacancy::{field_text, StructuredVacancy};

pub const SALARY_FROM_KEY: &str = "Зарплата от";
pub const SALARY_TO_KEY: &str = "Зарплата до";
pub const CURRENCY_KEY: &str = "Валюта";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub currency: Option<String>,
}

impl SalaryRange {
    pub fn from_vacancy(vacancy: &StructuredVacancy) -> Self {
        let bound = |key: &str| vacancy.salary.get(key).and_then(parse_salary_bound);
        Self {
            min: bound(SALARY_FROM_KEY),
            max: bound(SALARY_TO_KEY),
            currency: vacancy.salary.get(CURRENCY_KEY).and_then(field_text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Concatenates every digit of a salary value ("от 120 000 руб." → 120000).
///
/// `None` for placeholders, values without digits, and values that overflow.
pub fn parse_salary_bound(value: &Value) -> Option<u64> {
    if let Value::Number(n) = value {
        return n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f.round() as u64)
        });
    }

    let text = field_text(value)?;
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
