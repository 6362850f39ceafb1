// Cross-cutting prompt fragments. Each feature keeps its own prompts.rs alongside it.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that rewrites resume content.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only use facts present in the resume provided. \
    Do NOT invent employers, titles, dates, metrics, degrees, or skills. \
    Rephrase and reprioritize; never fabricate.";
