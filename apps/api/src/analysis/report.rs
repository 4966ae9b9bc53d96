//! Coverage report — the aggregate result of one analysis, plus its plain-text rendering.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::analysis::matcher::{MissingCategory, RequirementMatch};
use crate::analysis::scoring::{ScoreDistribution, KNOWLEDGE_BUDGET, UNMATCHED_BUDGET};
use crate::taxonomy::{TaxonomyCategory, MAX_RATING};
use crate::vacancy::requirements::RequirementItem;

/// Missing categories listed by [`render_summary`].
const SUMMARY_MISSING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub requirements: Vec<RequirementItem>,
    /// Matched requirements only, in requirement order.
    pub matches: Vec<RequirementMatch>,
    pub missing_important_categories: Vec<MissingCategory>,
    pub top_categories: Vec<TaxonomyCategory>,
    pub knowledge_scores: ScoreDistribution,
    pub unmatched_requirements: Vec<RequirementItem>,
    pub unmatched_scores: ScoreDistribution,
    /// Distinct matched categories over taxonomy size, in [0, 100].
    pub coverage_percentage: f64,
}

/// `distinct_matched / taxonomy_len × 100`; 0 for an empty taxonomy.
pub fn coverage_percentage(distinct_matched: usize, taxonomy_len: usize) -> f64 {
    if taxonomy_len == 0 {
        return 0.0;
    }
    (distinct_matched as f64 / taxonomy_len as f64 * 100.0).clamp(0.0, 100.0)
}

/// Renders a report for people: coverage, both score groups, matches and the most
/// important gaps.
pub fn render_summary(report: &CoverageReport) -> String {
    let mut out = String::new();

    // writeln! into a String cannot fail
    let _ = writeln!(out, "REQUIREMENT COVERAGE ANALYSIS");
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out);
    let _ = writeln!(out, "Knowledge coverage: {:.1}%", report.coverage_percentage);

    if !report.knowledge_scores.is_empty() && !report.top_categories.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "SCORE GROUP 1 ({KNOWLEDGE_BUDGET} points across top knowledge areas, by development priority):"
        );
        let mut sorted: Vec<_> = report.knowledge_scores.iter().collect();
        sorted.sort_by(|a, b| b.points.total_cmp(&a.points));
        for (i, entry) in sorted.into_iter().enumerate() {
            let rating = report
                .top_categories
                .iter()
                .find(|c| c.name == entry.key)
                .map(|c| c.importance)
                .unwrap_or(0.0);
            let _ = writeln!(
                out,
                "  {:2}. {}: {} points (rating: {rating:.1}/{MAX_RATING:.1})",
                i + 1,
                entry.key,
                entry.points
            );
        }
    }

    if !report.unmatched_scores.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "SCORE GROUP 2 ({UNMATCHED_BUDGET} points across requirements with no matching category):"
        );
        for (i, entry) in report.unmatched_scores.iter().enumerate() {
            let _ = writeln!(out, "  {:2}. {}: {} points", i + 1, entry.key, entry.points);
        }
    }

    if !report.matches.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "MATCHES:");
        for m in &report.matches {
            let _ = writeln!(out, "  Requirement: {}", m.requirement);
            for category in &m.categories {
                let points = report.knowledge_scores.get(category).unwrap_or(0.0);
                let _ = writeln!(out, "    -> {category} ({points} points)");
            }
        }
    }

    if !report.missing_important_categories.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "RECOMMENDED ADDITIONS (important areas no requirement covers):");
        for missing in report
            .missing_important_categories
            .iter()
            .take(SUMMARY_MISSING_LIMIT)
        {
            let points = report.knowledge_scores.get(&missing.name).unwrap_or(0.0);
            let _ = writeln!(
                out,
                "  * {} (importance: {:.1}/{MAX_RATING:.1}, points: {points})",
                missing.name, missing.importance
            );
        }
    }

    out.trim_end().to_string()
}
