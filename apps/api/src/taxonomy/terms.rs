//! Term Index — lowercase term → taxonomy category names.
//!
//! A static configuration asset. The built-in table covers the Russian-language vacancy
//! vocabulary plus common technology names; a JSON file can replace it at startup.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::taxonomy::{expect_object, read_json_file, DataError};

/// One term and every category it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermEntry {
    pub term: String,
    pub categories: Vec<String>,
}

/// Immutable many-to-many mapping from term to categories, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    entries: Vec<TermEntry>,
}

const COMPUTERS: &str = "Computers and Electronics";
const PROGRAMMING: &str = "Programming";
const DATABASES: &str = "Data Base Management";
const OPERATING_SYSTEMS: &str = "Operating Systems";
const TELECOM: &str = "Telecommunications";
const ADMINISTRATION: &str = "Administration and Management";
const PROJECT_MANAGEMENT: &str = "Project Management";
const CUSTOMER_SERVICE: &str = "Customer and Personal Service";
const ENGLISH: &str = "English Language";
const FOREIGN_LANGUAGE: &str = "Foreign Language";
const COMMUNICATIONS: &str = "Communications and Media";
const CLERICAL: &str = "Clerical";
const BUSINESS: &str = "Business and Economics";
const ACCOUNTING: &str = "Economics and Accounting";
const MATHEMATICS: &str = "Mathematics";
const PERSONNEL: &str = "Personnel and Human Resources";
const EDUCATION: &str = "Education and Training";
const LAW: &str = "Law and Government";
const MEDICINE: &str = "Medicine and Dentistry";
const DESIGN: &str = "Design";
const FINE_ARTS: &str = "Fine Arts";
const SALES: &str = "Sales and Marketing";
const PRODUCTION: &str = "Production and Processing";
const SAFETY: &str = "Public Safety and Security";
const TRANSPORTATION: &str = "Transportation";
const CONSTRUCTION: &str = "Building and Construction";
const GENERAL: &str = "General Skills";

const TECH: &[&str] = &[COMPUTERS, PROGRAMMING];
const DATA: &[&str] = &[COMPUTERS, DATABASES];
const OS: &[&str] = &[COMPUTERS, OPERATING_SYSTEMS];
const NETWORK: &[&str] = &[COMPUTERS, TELECOM];
const LANGUAGE: &[&str] = &[ENGLISH, FOREIGN_LANGUAGE];
const ARTS: &[&str] = &[DESIGN, FINE_ARTS];

/// Built-in term table.
const DEFAULT_TERMS: &[(&str, &[&str])] = &[
    // software and hardware
    ("программирование", TECH),
    ("python", TECH),
    ("javascript", TECH),
    ("java", TECH),
    ("c++", TECH),
    ("разработка", TECH),
    ("веб-разработка", TECH),
    ("базы данных", DATA),
    ("sql", DATA),
    ("postgresql", DATA),
    ("mysql", DATA),
    ("git", TECH),
    ("docker", TECH),
    ("kubernetes", TECH),
    ("linux", OS),
    ("windows", OS),
    ("сети", NETWORK),
    ("lan", NETWORK),
    ("san", NETWORK),
    ("сервер", NETWORK),
    ("оборудование", NETWORK),
    ("hardware", NETWORK),
    // management
    ("управление", &[ADMINISTRATION]),
    ("менеджмент", &[ADMINISTRATION]),
    ("проект", &[ADMINISTRATION, PROJECT_MANAGEMENT]),
    ("планирование", &[ADMINISTRATION]),
    ("координация", &[ADMINISTRATION]),
    ("руководство", &[ADMINISTRATION]),
    ("лидерство", &[ADMINISTRATION]),
    ("стратегия", &[ADMINISTRATION]),
    // customer service
    ("клиент", &[CUSTOMER_SERVICE]),
    ("пользователь", &[CUSTOMER_SERVICE]),
    ("поддержка", &[CUSTOMER_SERVICE]),
    ("сервис", &[CUSTOMER_SERVICE]),
    ("консультация", &[CUSTOMER_SERVICE]),
    // language and communication
    ("английский", LANGUAGE),
    ("язык", LANGUAGE),
    ("коммуникация", &[COMMUNICATIONS]),
    ("презентация", &[COMMUNICATIONS]),
    ("документация", &[COMMUNICATIONS, CLERICAL]),
    ("отчет", &[COMMUNICATIONS, CLERICAL]),
    // business and finance
    ("бизнес", &[BUSINESS]),
    ("экономика", &[BUSINESS]),
    ("финансы", &[BUSINESS, ACCOUNTING]),
    ("бухгалтерия", &[ACCOUNTING]),
    ("бюджет", &[ACCOUNTING]),
    ("анализ", &[BUSINESS, MATHEMATICS]),
    ("статистика", &[MATHEMATICS]),
    ("математика", &[MATHEMATICS]),
    // people
    ("персонал", &[PERSONNEL]),
    ("hr", &[PERSONNEL]),
    ("рекрутинг", &[PERSONNEL]),
    ("обучение", &[PERSONNEL, EDUCATION]),
    ("тренинг", &[PERSONNEL, EDUCATION]),
    ("образование", &[EDUCATION]),
    ("педагогика", &[EDUCATION]),
    ("преподавание", &[EDUCATION]),
    // law
    ("право", &[LAW]),
    ("юридический", &[LAW]),
    ("закон", &[LAW]),
    ("договор", &[LAW]),
    // medicine
    ("медицина", &[MEDICINE]),
    ("здоровье", &[MEDICINE]),
    ("медицинский", &[MEDICINE]),
    // design
    ("дизайн", ARTS),
    ("графика", ARTS),
    ("ui", ARTS),
    ("ux", ARTS),
    ("интерфейс", ARTS),
    // sales
    ("маркетинг", &[SALES]),
    ("продажи", &[SALES]),
    ("реклама", &[SALES]),
    ("smm", &[SALES]),
    ("seo", &[SALES]),
    // production
    ("производство", &[PRODUCTION]),
    ("изготовление", &[PRODUCTION]),
    ("сборка", &[PRODUCTION]),
    ("контроль качества", &[PRODUCTION]),
    // security
    ("безопасность", &[SAFETY]),
    ("охрана", &[SAFETY]),
    ("защита", &[SAFETY]),
    // transport
    ("транспорт", &[TRANSPORTATION]),
    ("логистика", &[TRANSPORTATION]),
    ("доставка", &[TRANSPORTATION]),
    // construction
    ("строительство", &[CONSTRUCTION]),
    ("ремонт", &[CONSTRUCTION]),
    ("монтаж", &[CONSTRUCTION]),
    // office
    ("excel", &[CLERICAL]),
    ("word", &[CLERICAL]),
    ("powerpoint", &[CLERICAL]),
    ("офис", &[CLERICAL]),
    ("делопроизводство", &[CLERICAL]),
    ("архив", &[CLERICAL]),
    // personal qualities
    ("ответственность", &[GENERAL]),
    ("командная работа", &[GENERAL]),
    ("адаптивность", &[GENERAL]),
    ("креативность", &[GENERAL]),
    ("аналитическое мышление", &[GENERAL]),
    ("решение проблем", &[GENERAL]),
];

impl TermIndex {
    /// The built-in term table.
    pub fn builtin() -> Self {
        Self::from_entries(DEFAULT_TERMS.iter().map(|(term, categories)| {
            (
                term.to_string(),
                categories.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            )
        }))
    }

    /// Builds an index from `(term, categories)` pairs.
    ///
    /// Terms are lowercased and trimmed; empty terms are dropped; a repeated term merges its
    /// categories into the first occurrence.
    pub fn from_entries<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut entries: Vec<TermEntry> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (term, categories) in pairs {
            let term = term.trim().to_lowercase();
            if term.is_empty() {
                continue;
            }
            let idx = *positions.entry(term.clone()).or_insert_with(|| {
                entries.push(TermEntry {
                    term,
                    categories: Vec::new(),
                });
                entries.len() - 1
            });
            let entry = &mut entries[idx];
            for category in categories {
                if !entry.categories.contains(&category) {
                    entry.categories.push(category);
                }
            }
        }

        Self { entries }
    }

    /// Loads a replacement table from a JSON object `{term: [category, ...]}`.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let value = read_json_file(path)?;
        let object = expect_object(&value, "term index")?;

        let pairs = object.iter().map(|(term, categories)| {
            let categories = match categories {
                serde_json::Value::Array(items) => items
                    .iter()
                    .filter_map(|c| c.as_str().map(str::to_string))
                    .collect(),
                serde_json::Value::String(single) => vec![single.clone()],
                _ => Vec::new(),
            };
            (term.clone(), categories)
        });

        let index = Self::from_entries(pairs);
        info!("Loaded {} terms from {}", index.len(), path.display());
        Ok(index)
    }

    /// Every entry whose term occurs as a substring of `text_lower`.
    pub fn terms_in<'a>(&'a self, text_lower: &'a str) -> impl Iterator<Item = &'a TermEntry> {
        self.entries
            .iter()
            .filter(move |e| text_lower.contains(e.term.as_str()))
    }

    pub fn categories_for(&self, term: &str) -> Option<&[String]> {
        let term = term.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.term == term)
            .map(|e| e.categories.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
