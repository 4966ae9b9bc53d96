//! Matcher — maps requirement lines onto the categories of one occupation's taxonomy.
//!
//! Algorithm:
//! 1. Lowercase the requirement's "field: value" text
//! 2. Every TermIndex term contained in it contributes all of its categories
//!    that exist in the supplied taxonomy (others are ignored)
//! 3. No ranking or best-match selection — every hit is kept, de-duplicated in hit order
//!
//! Cost is O(requirements × terms). Short terms can produce false positives
//! ("java" inside "javascript"); that is accepted behavior of containment matching.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::taxonomy::terms::TermIndex;
use crate::taxonomy::Taxonomy;
use crate::vacancy::requirements::RequirementItem;

/// Categories with at least this importance count as material gaps when unmatched.
pub const IMPORTANT_THRESHOLD: f64 = 3.0;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// The categories one requirement maps to. Empty `categories` means unmatched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementMatch {
    pub requirement: RequirementItem,
    pub categories: Vec<String>,
}

impl RequirementMatch {
    pub fn is_matched(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// Match outcome for every requirement, in requirement order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchResult {
    entries: Vec<RequirementMatch>,
}

impl MatchResult {
    pub fn entries(&self) -> &[RequirementMatch] {
        &self.entries
    }

    pub fn matched(&self) -> impl Iterator<Item = &RequirementMatch> {
        self.entries.iter().filter(|m| m.is_matched())
    }

    /// Requirements with an empty match set, in original order.
    pub fn unmatched_requirements(&self) -> Vec<RequirementItem> {
        self.entries
            .iter()
            .filter(|m| !m.is_matched())
            .map(|m| m.requirement.clone())
            .collect()
    }

    /// Distinct categories referenced by any requirement, in first-hit order.
    pub fn matched_categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .flat_map(|m| m.categories.iter())
            .filter(|c| seen.insert(c.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// A taxonomy category no requirement referenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingCategory {
    pub name: String,
    pub importance: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

pub struct Matcher<'a> {
    terms: &'a TermIndex,
}

impl<'a> Matcher<'a> {
    pub fn new(terms: &'a TermIndex) -> Self {
        Self { terms }
    }

    pub fn match_requirements(
        &self,
        requirements: &[RequirementItem],
        taxonomy: &Taxonomy,
    ) -> MatchResult {
        let entries = requirements
            .iter()
            .map(|requirement| RequirementMatch {
                requirement: requirement.clone(),
                categories: self.categories_for(requirement, taxonomy),
            })
            .collect();

        MatchResult { entries }
    }

    fn categories_for(&self, requirement: &RequirementItem, taxonomy: &Taxonomy) -> Vec<String> {
        let text = requirement.to_string().to_lowercase();
        let mut categories: Vec<String> = Vec::new();

        for entry in self.terms.terms_in(&text) {
            for category in &entry.categories {
                if taxonomy.contains(category) && !categories.contains(category) {
                    categories.push(category.clone());
                }
            }
        }

        categories
    }
}

/// Unreferenced categories with importance ≥ [`IMPORTANT_THRESHOLD`], most important first.
/// Equal importance keeps taxonomy order.
pub fn missing_important_categories(
    matches: &MatchResult,
    taxonomy: &Taxonomy,
) -> Vec<MissingCategory> {
    let used: HashSet<&str> = matches.matched_categories().into_iter().collect();

    let mut missing: Vec<MissingCategory> = taxonomy
        .iter()
        .filter(|c| c.importance >= IMPORTANT_THRESHOLD && !used.contains(c.name.as_str()))
        .map(|c| MissingCategory {
            name: c.name.clone(),
            importance: c.importance,
        })
        .collect();

    missing.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    missing
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
