// Shared prompt fragments.
// Each module that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Appended to every prompt whose output must be machine-parsed.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with valid JSON only. \
    Do NOT include any text outside the JSON. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that writes prose about the candidate.
pub const GROUNDING_INSTRUCTION: &str = "Use ONLY facts present in the context above. \
    Do NOT infer, interpolate, or invent skills, employers, dates or degrees. \
    If the context does not support a claim, omit it.";
