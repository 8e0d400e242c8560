// LLM prompt constants for the indexing module.

pub const PROFILE_SUMMARY_SYSTEM: &str =
    "You are an expert technical recruiter writing dense candidate profiles \
    for semantic search. Respond with the profile text only. \
    Do NOT include headings, markdown, or commentary.";

/// Profile summary prompt template. Replace `{profile_json}` before sending.
pub const PROFILE_SUMMARY_PROMPT_TEMPLATE: &str = "\
Write a detailed technical profile for this candidate based on the record \
provided. Mention their senior roles, specific technologies used in \
production, complex projects handled, educational background and noteworthy \
certifications and awards. Focus on hard skills and domain knowledge. The \
response will be embedded for retrieval, so keep it dense and under 1000 \
characters.

CANDIDATE RECORD:
{profile_json}";
