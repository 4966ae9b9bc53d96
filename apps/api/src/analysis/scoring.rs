//! Score allocation — distributes fixed point budgets across categories and requirements.
//!
//! Two independent 100-point budgets:
//! - knowledge: over the top-K categories by importance, weighted *inversely* by importance
//!   (the budget measures attention still needed, not how critical the area is)
//! - unmatched: split equally across requirements no category covers
//!
//! Rounding follows one [`BudgetPolicy`] for every budget in the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::taxonomy::{Taxonomy, TaxonomyCategory, MAX_RATING};
use crate::vacancy::requirements::RequirementItem;

pub const KNOWLEDGE_BUDGET: f64 = 100.0;
pub const UNMATCHED_BUDGET: f64 = 100.0;
pub const DEFAULT_TOP_K: usize = 5;

/// Decimal places kept by the 100-point budgets.
const SCORE_DECIMALS: u32 = 1;

// ────────────────────────────────────────────────────────────────────────────
// Policy
// ────────────────────────────────────────────────────────────────────────────

/// How rounded allocations relate to their budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPolicy {
    /// Each value is rounded on its own; the nominal budget is reported as the total and the
    /// rounding residue (at most half a unit per item) is tolerated.
    #[default]
    Nominal,
    /// Largest-remainder apportionment: rounded values sum exactly to the budget.
    Exact,
}

impl FromStr for BudgetPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nominal" => Ok(Self::Nominal),
            "exact" => Ok(Self::Exact),
            other => Err(format!(
                "unknown budget policy '{other}' (expected 'nominal' or 'exact')"
            )),
        }
    }
}

impl fmt::Display for BudgetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nominal => f.write_str("nominal"),
            Self::Exact => f.write_str("exact"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Score distribution
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub key: String,
    pub points: f64,
}

/// Points per key, in allocation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreDistribution {
    entries: Vec<ScoreEntry>,
}

impl ScoreDistribution {
    fn from_pairs(keys: Vec<String>, points: Vec<f64>) -> Self {
        Self {
            entries: keys
                .into_iter()
                .zip(points)
                .map(|(key, points)| ScoreEntry { key, points })
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.points)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.points).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoreEntry> {
        self.entries.iter()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rounding and apportionment
// ────────────────────────────────────────────────────────────────────────────

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Splits `budget` proportionally to `shares`, rounded to `decimals` places.
///
/// Under [`BudgetPolicy::Exact`] the largest-remainder method is applied so the values sum
/// to the budget exactly (ties go to the earlier item). Non-positive share totals yield zeros.
pub fn apportion(shares: &[f64], budget: f64, decimals: u32, policy: BudgetPolicy) -> Vec<f64> {
    let total: f64 = shares.iter().sum();
    if shares.is_empty() || total <= 0.0 {
        return vec![0.0; shares.len()];
    }

    let raw: Vec<f64> = shares.iter().map(|s| (s / total) * budget).collect();
    match policy {
        BudgetPolicy::Nominal => raw.iter().map(|v| round_to(*v, decimals)).collect(),
        BudgetPolicy::Exact => largest_remainder(&raw, budget, decimals),
    }
}

fn largest_remainder(raw: &[f64], budget: f64, decimals: u32) -> Vec<f64> {
    let factor = 10_f64.powi(decimals as i32);
    let target_units = (budget * factor).round() as i64;

    // the epsilon absorbs representation noise such as 249.99999999997
    let scaled: Vec<f64> = raw.iter().map(|v| v * factor).collect();
    let mut units: Vec<i64> = scaled.iter().map(|v| (v + 1e-9).floor() as i64).collect();

    let mut remaining = target_units - units.iter().sum::<i64>();
    if remaining > 0 {
        let mut order: Vec<usize> = (0..raw.len()).collect();
        order.sort_by(|&a, &b| {
            let frac_a = scaled[a] - units[a] as f64;
            let frac_b = scaled[b] - units[b] as f64;
            frac_b.total_cmp(&frac_a)
        });
        for idx in order.into_iter().cycle() {
            if remaining == 0 {
                break;
            }
            units[idx] += 1;
            remaining -= 1;
        }
    }

    units.into_iter().map(|u| u as f64 / factor).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Knowledge budget
// ────────────────────────────────────────────────────────────────────────────

/// The `k` most important categories. Stable: equal importance keeps taxonomy order.
pub fn top_categories(taxonomy: &Taxonomy, k: usize) -> Vec<TaxonomyCategory> {
    let mut ranked: Vec<TaxonomyCategory> = taxonomy.iter().cloned().collect();
    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    ranked.truncate(k);
    ranked
}

/// `(MAX_RATING + 1) - importance`: less prominent areas receive more points.
pub fn inverse_importance_weight(importance: f64) -> f64 {
    (MAX_RATING + 1.0) - importance
}

/// Distributes [`KNOWLEDGE_BUDGET`] across `top` in inverse proportion to importance.
pub fn allocate_knowledge_scores(
    top: &[TaxonomyCategory],
    policy: BudgetPolicy,
) -> ScoreDistribution {
    let weights: Vec<f64> = top
        .iter()
        .map(|c| inverse_importance_weight(c.importance))
        .collect();
    let points = apportion(&weights, KNOWLEDGE_BUDGET, SCORE_DECIMALS, policy);
    ScoreDistribution::from_pairs(top.iter().map(|c| c.name.clone()).collect(), points)
}

// ────────────────────────────────────────────────────────────────────────────
// Unmatched budget
// ────────────────────────────────────────────────────────────────────────────

/// Splits [`UNMATCHED_BUDGET`] equally; empty input gives an empty distribution.
pub fn allocate_unmatched_scores(
    unmatched: &[RequirementItem],
    policy: BudgetPolicy,
) -> ScoreDistribution {
    let shares = vec![1.0; unmatched.len()];
    let points = apportion(&shares, UNMATCHED_BUDGET, SCORE_DECIMALS, policy);
    ScoreDistribution::from_pairs(unmatched.iter().map(ToString::to_string).collect(), points)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(name: &str, importance: f64) -> TaxonomyCategory {
        TaxonomyCategory::new(name, importance, None)
    }

    #[test]
    fn test_lower_importance_receives_more_points() {
        let top = vec![cat("Programming", 4.5), cat("Administration and Management", 2.0)];
        let scores = allocate_knowledge_scores(&top, BudgetPolicy::Nominal);

        // weights 1.5 and 4.0 over 5.5
        assert_eq!(scores.get("Programming"), Some(27.3));
        assert_eq!(scores.get("Administration and Management"), Some(72.7));
        assert!(scores.get("Administration and Management") > scores.get("Programming"));
    }

    #[test]
    fn test_share_is_taken_before_scaling_to_the_budget() {
        // weights 1.38, 1.9, 4.08: 1.38 / 7.36 * 100 is 18.749999999999996, not 18.75
        let top = vec![cat("A", 4.62), cat("B", 4.1), cat("C", 1.92)];
        let scores = allocate_knowledge_scores(&top, BudgetPolicy::Nominal);
        assert_eq!(scores.get("A"), Some(18.7));
        assert_eq!(scores.get("B"), Some(25.8));
        assert_eq!(scores.get("C"), Some(55.4));
    }

    #[test]
    fn test_knowledge_sum_within_rounding_tolerance() {
        let top = vec![
            cat("A", 4.9),
            cat("B", 4.4),
            cat("C", 3.7),
            cat("D", 3.3),
            cat("E", 1.1),
        ];
        let scores = allocate_knowledge_scores(&top, BudgetPolicy::Nominal);
        assert_eq!(scores.len(), 5);
        assert!((scores.total() - 100.0).abs() <= 0.1 * 5.0 + 1e-9);
    }

    #[test]
    fn test_exact_policy_sums_to_budget() {
        let top = vec![cat("A", 4.0), cat("B", 4.0), cat("C", 4.0)];
        let scores = allocate_knowledge_scores(&top, BudgetPolicy::Exact);
        assert!((scores.total() - 100.0).abs() < 1e-9);
        // ties in the remainder go to the earliest item
        assert_eq!(scores.get("A"), Some(33.4));
        assert_eq!(scores.get("B"), Some(33.3));
    }

    #[test]
    fn test_all_max_importance_splits_evenly() {
        let top = vec![cat("A", 5.0), cat("B", 5.0)];
        let scores = allocate_knowledge_scores(&top, BudgetPolicy::Nominal);
        assert_eq!(scores.get("A"), Some(50.0));
        assert_eq!(scores.get("B"), Some(50.0));
    }

    #[test]
    fn test_empty_selection_is_empty() {
        assert!(allocate_knowledge_scores(&[], BudgetPolicy::Nominal).is_empty());
        assert!(allocate_unmatched_scores(&[], BudgetPolicy::Exact).is_empty());
    }

    #[test]
    fn test_top_categories_stable_on_ties() {
        let taxonomy = Taxonomy::new(vec![
            cat("Low", 1.0),
            cat("First", 4.0),
            cat("Second", 4.0),
            cat("Top", 4.8),
        ]);
        let top = top_categories(&taxonomy, 3);
        let names: Vec<&str> = top.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Top", "First", "Second"]);
    }

    #[test]
    fn test_top_categories_fewer_than_k() {
        let taxonomy = Taxonomy::new(vec![cat("Only", 2.0)]);
        assert_eq!(top_categories(&taxonomy, DEFAULT_TOP_K).len(), 1);
    }

    #[test]
    fn test_unmatched_three_way_split() {
        let unmatched = vec![
            RequirementItem::new("X", "x"),
            RequirementItem::new("Y", "y"),
            RequirementItem::new("Z", "z"),
        ];
        let scores = allocate_unmatched_scores(&unmatched, BudgetPolicy::Nominal);
        for entry in scores.iter() {
            assert_eq!(entry.points, 33.3);
        }
        assert!((scores.total() - 99.9).abs() < 1e-9);
        assert_eq!(scores.get("X: x"), Some(33.3));
    }

    #[test]
    fn test_unmatched_equal_split_matches_rounded_share() {
        for n in 1..=12 {
            let unmatched: Vec<RequirementItem> = (0..n)
                .map(|i| RequirementItem::new("R", i.to_string()))
                .collect();
            let scores = allocate_unmatched_scores(&unmatched, BudgetPolicy::Nominal);
            let expected = round_to(100.0 / n as f64, 1);
            assert!(scores.iter().all(|e| e.points == expected), "n = {n}");
        }
    }

    #[test]
    fn test_apportion_exact_whole_units() {
        let values = apportion(&[30.0, 40.0, 80.0], 200.0, 0, BudgetPolicy::Exact);
        assert_eq!(values, vec![40.0, 53.0, 107.0]);
        assert_eq!(values.iter().sum::<f64>(), 200.0);
    }

    #[test]
    fn test_apportion_zero_total() {
        assert_eq!(
            apportion(&[0.0, 0.0], 100.0, 1, BudgetPolicy::Exact),
            vec![0.0, 0.0]
        );
    }

    #[test]
    fn test_policy_parses() {
        assert_eq!("Exact".parse::<BudgetPolicy>().unwrap(), BudgetPolicy::Exact);
        assert_eq!(" nominal ".parse::<BudgetPolicy>().unwrap(), BudgetPolicy::Nominal);
        assert!("strict".parse::<BudgetPolicy>().is_err());
    }
}
