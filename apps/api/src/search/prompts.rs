// LLM prompt constants for the search module.

/// System prompt for query extraction — enforces JSON-only output.
pub const EXTRACT_QUERY_SYSTEM: &str =
    "You are an expert technical recruiter distilling hiring requests. \
    Extract a structured retrieval query from free text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Query extraction prompt template. Replace `{request_text}` before sending.
pub const EXTRACT_QUERY_PROMPT_TEMPLATE: &str = r#"Distill the following hiring request into a structured retrieval query.

Return a JSON object with this EXACT schema (no extra fields):
{
  "semantic_query": "Senior React developer with fintech background and production TypeScript",
  "min_years_experience": 3,
  "required_skills": ["React", "TypeScript"],
  "location": "Amman, Jordan"
}

Rules:
- "semantic_query": a dense technical summary of the ideal candidate —
  seniority, core technologies, domain. Maximum 300 characters.
- "min_years_experience": the minimum years explicitly or implicitly
  required. Use 0 when the text gives no signal.
- "required_skills": only skills that are clearly hard requirements.
  Use [] when none are stated.
- "location": the preferred location exactly as stated ("City, Country"
  or "Remote"). OMIT the field entirely when no location is mentioned.
- If the text contains no hiring signal at all, return the object with
  an empty semantic_query, 0 years, and [] skills rather than guessing.

HIRING REQUEST:
{request_text}"#;
