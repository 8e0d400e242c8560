//! The three tool operations exposed to the conversational controller.
//!
//! Each is a single atomic call; the only state shared between calls is
//! what the controller passes explicitly. Payloads are validated at this
//! boundary — a malformed payload is rejected, never propagated.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::agent::protocol::TurnProtocol;
use crate::errors::AppError;
use crate::llm_client::{ToolCall, ToolSpec};
use crate::models::candidate::{CandidateRecord, StructuredQuery};
use crate::search::query::extract_query;
use crate::search::retrieval::{retrieve, DEFAULT_RETRIEVAL_LIMIT};
use crate::search::scoring::score_candidates;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    ExtractQuery,
    FindCandidates,
    AddReasoning,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::ExtractQuery => "extract_query",
            ToolKind::FindCandidates => "find_candidates",
            ToolKind::AddReasoning => "add_reasoning",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "extract_query" => Some(ToolKind::ExtractQuery),
            "find_candidates" => Some(ToolKind::FindCandidates),
            "add_reasoning" => Some(ToolKind::AddReasoning),
            _ => None,
        }
    }
}

/// The tool schemas advertised to the controller.
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec::function(
            "extract_query",
            "Extract a structured retrieval query (semantic summary, minimum \
             years of experience, required skills, optional location) from a \
             job description or hiring request.",
            json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The hiring request or job description, verbatim."
                    }
                },
                "required": ["text"]
            }),
        ),
        ToolSpec::function(
            "find_candidates",
            "Search the candidate index with the structured query produced \
             by extract_query. Returns enriched candidate records ordered \
             by similarity.",
            json!({
                "type": "object",
                "properties": {
                    "semantic_query": {
                        "type": "string",
                        "description": "Technical summary of the ideal candidate, max 300 characters."
                    },
                    "min_years_experience": {
                        "type": "integer",
                        "description": "Minimum years of experience required."
                    },
                    "required_skills": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Critical technical skills, e.g. [\"React\", \"TypeScript\"]."
                    },
                    "location": {
                        "type": "string",
                        "description": "Preferred location, omit when not mentioned."
                    }
                },
                "required": ["semantic_query", "min_years_experience", "required_skills"]
            }),
        ),
        ToolSpec::function(
            "add_reasoning",
            "Score the retrieved candidates against the job requirements and \
             attach a short reasoning per candidate. MUST be called after \
             find_candidates, before presenting results.",
            json!({
                "type": "object",
                "properties": {
                    "job_requirements": {
                        "type": "object",
                        "description": "The structured query returned by extract_query.",
                        "properties": {
                            "semantic_query": {"type": "string"},
                            "min_years_experience": {"type": "integer"},
                            "required_skills": {"type": "array", "items": {"type": "string"}},
                            "location": {"type": "string"}
                        },
                        "required": ["semantic_query", "min_years_experience", "required_skills"]
                    },
                    "candidates": {
                        "type": "array",
                        "description": "The candidate records returned by find_candidates, unmodified.",
                        "items": {"type": "object"}
                    }
                },
                "required": ["job_requirements", "candidates"]
            }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct ExtractQueryArgs {
    text: String,
}

#[derive(Debug, Deserialize)]
struct AddReasoningArgs {
    job_requirements: StructuredQuery,
    candidates: Vec<CandidateRecord>,
}

/// Authorizes and executes one proposed tool call, returning the JSON
/// payload to append to the message log.
pub async fn dispatch(
    call: &ToolCall,
    state: &AppState,
    protocol: &mut TurnProtocol,
) -> Result<Value, AppError> {
    let kind = ToolKind::from_name(&call.function.name).ok_or_else(|| {
        AppError::Validation(format!("unknown tool `{}`", call.function.name))
    })?;

    protocol.authorize(kind)?;

    match kind {
        ToolKind::ExtractQuery => {
            let args: ExtractQueryArgs = parse_args(kind, &call.function.arguments)?;
            info!("[extract_query] extracting from {} chars", args.text.len());

            let query = extract_query(&args.text, &state.llm).await?;
            protocol.record_query(query.clone());
            Ok(serde_json::to_value(query).map_err(anyhow::Error::from)?)
        }
        ToolKind::FindCandidates => {
            let args: StructuredQuery = parse_args(kind, &call.function.arguments)?;
            let query = args.normalized();
            info!(
                "[find_candidates] min_yoe={} skills={:?}",
                query.min_years_experience, query.required_skills
            );

            let records = retrieve(
                &query,
                DEFAULT_RETRIEVAL_LIMIT,
                &state.llm,
                state.index.as_ref(),
                state.profiles.as_ref(),
            )
            .await?;
            info!("[find_candidates] {} candidates", records.len());

            protocol.record_retrieval(records.clone());
            Ok(serde_json::to_value(records).map_err(anyhow::Error::from)?)
        }
        ToolKind::AddReasoning => {
            let args: AddReasoningArgs = parse_args(kind, &call.function.arguments)?;
            let requirements = args.job_requirements.normalized();

            let candidates =
                traceable_candidates(&protocol.retrieved_ids(), args.candidates);

            let scored = score_candidates(&requirements, &candidates, &state.weights);
            info!("[add_reasoning] scored {} candidates", scored.len());

            protocol.record_scored(scored.clone());
            Ok(serde_json::to_value(scored).map_err(anyhow::Error::from)?)
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(
    kind: ToolKind,
    arguments: &str,
) -> Result<T, AppError> {
    serde_json::from_str(arguments).map_err(|e| {
        AppError::Validation(format!("malformed `{}` payload: {e}", kind.name()))
    })
}

/// Scoring input must be traceable to retrieval output. A record with an
/// unknown identity is skipped and logged, not fatal to the batch.
fn traceable_candidates(
    known: &std::collections::HashSet<uuid::Uuid>,
    candidates: Vec<CandidateRecord>,
) -> Vec<CandidateRecord> {
    candidates
        .into_iter()
        .filter(|c| {
            let traceable = known.contains(&c.user_id);
            if !traceable {
                warn!(
                    "[add_reasoning] candidate {} not in retrieval output, skipping",
                    c.user_id
                );
            }
            traceable
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_round_trip() {
        for kind in [
            ToolKind::ExtractQuery,
            ToolKind::FindCandidates,
            ToolKind::AddReasoning,
        ] {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("delete_candidates"), None);
    }

    #[test]
    fn test_tool_specs_cover_the_three_operations() {
        let specs = tool_specs();
        let names: Vec<_> = specs.iter().map(|s| s.function.name).collect();
        assert_eq!(
            names,
            vec!["extract_query", "find_candidates", "add_reasoning"]
        );
    }

    #[test]
    fn test_find_candidates_args_reject_malformed_payload() {
        let result: Result<StructuredQuery, AppError> = parse_args(
            ToolKind::FindCandidates,
            r#"{"min_years_experience": "three"}"#,
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_add_reasoning_args_deserialize() {
        let args: AddReasoningArgs = parse_args(
            ToolKind::AddReasoning,
            r#"{
                "job_requirements": {
                    "semantic_query": "Senior React dev",
                    "min_years_experience": 3,
                    "required_skills": ["React"]
                },
                "candidates": [{
                    "user_id": "00000000-0000-0000-0000-000000000000",
                    "similarity": 0.82,
                    "total_years_experience": 4,
                    "skill_list": ["React"]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(args.job_requirements.min_years_experience, 3);
        assert_eq!(args.candidates.len(), 1);
        assert_eq!(args.candidates[0].total_years_experience, 4);
    }

    #[test]
    fn test_untraceable_candidates_are_skipped_not_fatal() {
        use std::collections::HashSet;
        use uuid::Uuid;

        let known_id = Uuid::new_v4();
        let known: HashSet<Uuid> = HashSet::from([known_id]);

        let record = |user_id| CandidateRecord {
            user_id,
            similarity: 0.8,
            total_years_experience: 4,
            skill_list: vec![],
            name: None,
            location: None,
            profile_picture_url: None,
        };

        let kept = traceable_candidates(&known, vec![record(known_id), record(Uuid::new_v4())]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].user_id, known_id);
    }
}
