use async_trait::async_trait;
use tracing::debug;

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SHORT_ANSWER_SYSTEM};
use crate::llm_client::LlmClient;
use crate::oracle::prompts::{
    SKILLS_PROMPT_TEMPLATE, SKILLS_SYSTEM, SKILLS_TEMPERATURE, TITLE_PROMPT_TEMPLATE,
    TITLE_SYSTEM, TITLE_TEMPERATURE, ZONE_PROMPT_TEMPLATE, ZONE_SYSTEM, ZONE_TEMPERATURE,
};
use crate::oracle::{ClassificationOracle, OracleError, OracleSkillScores};
use crate::taxonomy::occupations::JobZone;

/// Language-model backed oracle.
pub struct LlmOracle {
    client: LlmClient,
}

impl LlmOracle {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

fn system_prompt(base: &str, format: &str) -> String {
    format!("{base} {format}")
}

pub(crate) fn zone_prompt(description: &str) -> String {
    ZONE_PROMPT_TEMPLATE.replace("{description}", description)
}

pub(crate) fn title_prompt(zone: JobZone, description: &str, titles: &[String]) -> String {
    TITLE_PROMPT_TEMPLATE
        .replace("{description}", description)
        .replace("{zone}", &zone.to_string())
        .replace("{titles}", &titles.join(", "))
}

pub(crate) fn skills_prompt(job_title: &str, requirements_text: &str) -> String {
    SKILLS_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{requirements}", requirements_text)
}

#[async_trait]
impl ClassificationOracle for LlmOracle {
    async fn classify_zone(&self, description: &str) -> Result<String, OracleError> {
        let reply = self
            .client
            .call_text(
                &zone_prompt(description),
                &system_prompt(ZONE_SYSTEM, SHORT_ANSWER_SYSTEM),
                ZONE_TEMPERATURE,
            )
            .await?;
        debug!("Zone oracle replied: {reply}");
        Ok(reply)
    }

    async fn select_title(
        &self,
        zone: JobZone,
        description: &str,
        titles: &[String],
    ) -> Result<String, OracleError> {
        let reply = self
            .client
            .call_text(
                &title_prompt(zone, description, titles),
                &system_prompt(TITLE_SYSTEM, SHORT_ANSWER_SYSTEM),
                TITLE_TEMPERATURE,
            )
            .await?;
        debug!("Title oracle replied: {reply}");
        Ok(reply)
    }

    async fn score_skills(
        &self,
        job_title: &str,
        requirements_text: &str,
    ) -> Result<OracleSkillScores, OracleError> {
        let scores = self
            .client
            .call_json::<OracleSkillScores>(
                &skills_prompt(job_title, requirements_text),
                &system_prompt(SKILLS_SYSTEM, JSON_ONLY_SYSTEM),
                SKILLS_TEMPERATURE,
            )
            .await?;
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prompt_lists_candidates() {
        let prompt = title_prompt(
            JobZone::new(4).unwrap(),
            "Backend developer",
            &["Software Developers".to_string(), "Web Developers".to_string()],
        );
        assert!(prompt.contains("Available jobs in zone 4:"));
        assert!(prompt.contains("Software Developers, Web Developers"));
        assert!(prompt.contains("\"Backend developer\""));
    }

    #[test]
    fn test_skills_prompt_fills_placeholders() {
        let prompt = skills_prompt("Data Scientists", "Языки программирования: Python");
        assert!(prompt.contains("\"Data Scientists\""));
        assert!(prompt.contains("Языки программирования: Python"));
        assert!(!prompt.contains("{requirements}"));
    }

    #[test]
    fn test_zone_prompt_embeds_description() {
        assert!(zone_prompt("cashier").contains("Description: \"cashier\""));
    }
}
