// Shared prompt fragments. Each oracle defines its own prompts alongside it
// (see `oracle::prompts`); this file holds cross-cutting pieces only.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment for one-line answers.
pub const SHORT_ANSWER_SYSTEM: &str = "Answer with the requested value only. \
    Do NOT add explanations, punctuation or formatting.";
