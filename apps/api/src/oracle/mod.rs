//! Classification oracle — the narrow seam between the engine and the language model.
//!
//! The engine never talks to the model directly. It sends a description (or a requirements
//! text) through [`ClassificationOracle`] and interprets the raw reply itself, so every
//! oracle failure can be turned into a deterministic fallback by the caller.
//!
//! Every call made by the engine goes through [`bounded`], which adds the configured
//! timeout on top of the HTTP client's own.

pub mod llm;
pub mod prompts;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::skill_budget::{RawSkillScores, SkillCategory, SkillItems};
use crate::llm_client::LlmError;
use crate::taxonomy::occupations::JobZone;

pub use llm::LlmOracle;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("oracle did not answer within {0:?}")]
    Timeout(Duration),

    #[error("oracle returned an empty reply")]
    EmptyReply,
}

/// Raw per-item skill points as returned by the scoring oracle, in reply order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleSkillScores {
    #[serde(default)]
    pub technical_skills: SkillItems,
    #[serde(default)]
    pub programming_languages: SkillItems,
    #[serde(default)]
    pub tools: SkillItems,
    #[serde(default)]
    pub soft_skills: SkillItems,
    #[serde(default)]
    pub domain_knowledge: SkillItems,
    #[serde(default)]
    pub analysis_summary: Option<String>,
}

impl OracleSkillScores {
    pub fn into_parts(self) -> (RawSkillScores, Option<String>) {
        let raw = RawSkillScores::from([
            (SkillCategory::TechnicalSkills, self.technical_skills),
            (SkillCategory::ProgrammingLanguages, self.programming_languages),
            (SkillCategory::Tools, self.tools),
            (SkillCategory::SoftSkills, self.soft_skills),
            (SkillCategory::DomainKnowledge, self.domain_knowledge),
        ]);
        (raw, self.analysis_summary)
    }
}

#[async_trait]
pub trait ClassificationOracle: Send + Sync {
    /// Free-text reply expected to contain a zone digit 1–5.
    async fn classify_zone(&self, description: &str) -> Result<String, OracleError>;

    /// Free-text reply expected to name one of `titles`.
    async fn select_title(
        &self,
        zone: JobZone,
        description: &str,
        titles: &[String],
    ) -> Result<String, OracleError>;

    async fn score_skills(
        &self,
        job_title: &str,
        requirements_text: &str,
    ) -> Result<OracleSkillScores, OracleError>;
}

/// Oracle used when no model is configured: every call fails, so callers always fall back.
pub struct UnavailableOracle;

const NO_MODEL: &str = "no language model configured";

#[async_trait]
impl ClassificationOracle for UnavailableOracle {
    async fn classify_zone(&self, _description: &str) -> Result<String, OracleError> {
        Err(OracleError::Unavailable(NO_MODEL.to_string()))
    }

    async fn select_title(
        &self,
        _zone: JobZone,
        _description: &str,
        _titles: &[String],
    ) -> Result<String, OracleError> {
        Err(OracleError::Unavailable(NO_MODEL.to_string()))
    }

    async fn score_skills(
        &self,
        _job_title: &str,
        _requirements_text: &str,
    ) -> Result<OracleSkillScores, OracleError> {
        Err(OracleError::Unavailable(NO_MODEL.to_string()))
    }
}

/// Runs an oracle call with an upper time bound.
pub async fn bounded<T, F>(timeout: Duration, call: F) -> Result<T, OracleError>
where
    F: Future<Output = Result<T, OracleError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(OracleError::Timeout(timeout)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
