// Prompt constants for the classification oracle.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Zone classification is near-deterministic.
pub const ZONE_TEMPERATURE: f32 = 0.1;
pub const TITLE_TEMPERATURE: f32 = 0.3;
pub const SKILLS_TEMPERATURE: f32 = 0.1;

pub const ZONE_SYSTEM: &str =
    "You are an expert in job classification. Respond only with the zone number.";

/// Replace `{description}` before sending.
pub const ZONE_PROMPT_TEMPLATE: &str = r#"Analyze the job description and determine which job zone it belongs to.

Description: "{description}"

Job Zones:
1. Zone 1: Little preparation needed - simple jobs requiring only high school education
2. Zone 2: Some preparation needed - jobs requiring basic skills and experience
3. Zone 3: Medium preparation needed - jobs requiring professional education
4. Zone 4: Considerable preparation needed - jobs requiring bachelor's degree
5. Zone 5: Extensive preparation needed - jobs requiring master's/PhD degree

Respond with ONLY the zone number (1, 2, 3, 4, or 5)."#;

pub const TITLE_SYSTEM: &str =
    "You are an expert in job matching. Select the most suitable job title from the provided list.";

/// Replace `{description}`, `{zone}` and `{titles}` before sending.
pub const TITLE_PROMPT_TEMPLATE: &str = r#"From the following list of job titles, select the ONE most suitable for this description:

Description: "{description}"

Available jobs in zone {zone}:
{titles}

Respond with ONLY the exact job title from the list."#;

/// System prompt for skill scoring. Combined with `JSON_ONLY_SYSTEM` at call time.
pub const SKILLS_SYSTEM: &str = "You are an expert in analysing occupational requirements \
    against the O*NET database. Distribute exactly 200 points across every skill, knowledge \
    area and competency a vacancy asks for.";

/// Replace `{job_title}` and `{requirements}` before sending.
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Analyse the requirements for the occupation "{job_title}" and distribute 200 points across all of its skills.

REQUIREMENTS:
{requirements}

Principles:
1. Use O*NET knowledge to judge how important each skill is for this occupation
2. Points are proportional to importance
3. The total must be exactly 200 points
4. Minimum 5 and maximum 50 points per skill

Categories:
- technical_skills: frameworks, technologies, techniques
- programming_languages: Python, JavaScript, Java, C++, ...
- tools: Git, Docker, IDEs, databases
- soft_skills: communication, leadership, teamwork
- domain_knowledge: domain expertise, methodologies

Return a JSON object with this EXACT schema:
{
  "technical_skills": {"skill name": 30},
  "programming_languages": {"language": 25},
  "tools": {"tool": 15},
  "soft_skills": {"skill": 10},
  "domain_knowledge": {"area": 20},
  "total_score": 200,
  "analysis_summary": "one or two sentences explaining the distribution"
}"#;
