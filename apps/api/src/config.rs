use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::scoring::{BudgetPolicy, DEFAULT_TOP_K};
use crate::analysis::AnalysisOptions;
use crate::llm_client::DEFAULT_MODEL;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub taxonomy_path: PathBuf,
    pub occupations_path: PathBuf,
    /// Replaces the built-in term table when set.
    pub term_index_path: Option<PathBuf>,
    /// Replaces the built-in zone profiles when set.
    pub zone_profiles_path: Option<PathBuf>,
    /// Without a key every oracle call degrades to its fallback.
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub oracle_timeout: Duration,
    pub top_k: usize,
    pub budget_policy: BudgetPolicy,
    pub fallback_seed: Option<u64>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let top_k: usize = parse_or(var("TOP_K_CATEGORIES"), DEFAULT_TOP_K)
            .context("TOP_K_CATEGORIES must be a positive integer")?;
        anyhow::ensure!(top_k > 0, "TOP_K_CATEGORIES must be at least 1");

        let budget_policy = match var("BUDGET_POLICY") {
            Some(raw) => raw
                .parse::<BudgetPolicy>()
                .map_err(anyhow::Error::msg)
                .context("BUDGET_POLICY is invalid")?,
            None => BudgetPolicy::default(),
        };

        Ok(Config {
            taxonomy_path: PathBuf::from(require("TAXONOMY_PATH")?),
            occupations_path: PathBuf::from(require("OCCUPATIONS_PATH")?),
            term_index_path: var("TERM_INDEX_PATH").map(PathBuf::from),
            zone_profiles_path: var("ZONE_PROFILES_PATH").map(PathBuf::from),
            anthropic_api_key: var("ANTHROPIC_API_KEY"),
            llm_model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            oracle_timeout: Duration::from_secs(
                parse_or(var("ORACLE_TIMEOUT_SECS"), 30)
                    .context("ORACLE_TIMEOUT_SECS must be a number of seconds")?,
            ),
            top_k,
            budget_policy,
            fallback_seed: var("FALLBACK_SEED")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .context("FALLBACK_SEED must be an unsigned integer")?,
            port: parse_or(var("PORT"), 8080).context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            top_k: self.top_k,
            policy: self.budget_policy,
        }
    }
}

fn parse_or<T>(value: Option<String>, default: T) -> Result<T, T::Err>
where
    T: FromStr,
{
    value.map_or(Ok(default), |v| v.trim().parse())
}
