// Shared prompt constants.
// Screening prompts live in screening/prompts.rs; this file holds cross-cutting fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every candidate-facing prompt.
pub const COMPLIANCE_INSTRUCTION: &str = "\
    Provide an objective, professional, and legally compliant assessment. \
    Judge only job-relevant evidence. Never consider or infer age, gender, ethnicity, \
    religion, disability, marital status, or any other protected characteristic.";
