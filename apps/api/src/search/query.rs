//! Query extraction — free-text hiring intent in, a `StructuredQuery` out.
//!
//! A pure transform over the input text plus one LLM call; this stage
//! never touches the candidate index. Text with no extractable hiring
//! signal still yields a valid empty-criteria query, which downstream
//! retrieval interprets as "show broadly relevant profiles".

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::candidate::StructuredQuery;
use crate::search::prompts::{EXTRACT_QUERY_PROMPT_TEMPLATE, EXTRACT_QUERY_SYSTEM};

/// Extracts and normalizes a structured retrieval query.
pub async fn extract_query(raw_text: &str, llm: &LlmClient) -> Result<StructuredQuery, AppError> {
    let prompt = EXTRACT_QUERY_PROMPT_TEMPLATE.replace("{request_text}", raw_text);
    let draft: StructuredQuery = llm
        .call_json(&prompt, EXTRACT_QUERY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Query extraction failed: {e}")))?;
    Ok(draft.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_draft_deserializes_full() {
        let json = r#"{
            "semantic_query": "Senior React dev with Fintech",
            "min_years_experience": 3,
            "required_skills": ["React", "TypeScript", "react"],
            "location": "Remote"
        }"#;

        let draft: StructuredQuery = serde_json::from_str(json).unwrap();
        let query = draft.normalized();
        assert_eq!(query.semantic_query, "Senior React dev with Fintech");
        assert_eq!(query.min_years_experience, 3);
        assert_eq!(query.required_skills, vec!["React", "TypeScript"]);
        assert_eq!(query.location.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_extraction_draft_tolerates_degenerate_output() {
        // The model is told to return empty fields for "hello"-class input;
        // missing fields must default rather than fail the stage.
        let draft: StructuredQuery =
            serde_json::from_str(r#"{"semantic_query": ""}"#).unwrap();
        let query = draft.normalized();
        assert_eq!(query.semantic_query, "");
        assert_eq!(query.min_years_experience, 0);
        assert!(query.required_skills.is_empty());
        assert!(query.location.is_none());
    }

    #[test]
    fn test_prompt_template_embeds_request_text() {
        let prompt = EXTRACT_QUERY_PROMPT_TEMPLATE.replace("{request_text}", "Need a Rust dev");
        assert!(prompt.ends_with("Need a Rust dev"));
        assert!(!prompt.contains("{request_text}"));
    }
}
