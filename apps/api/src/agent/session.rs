//! One agent turn: message history in, reply plus candidate artifact out.
//!
//! The turn keeps an append-only message log (system prompt, history,
//! tool exchanges) and loops controller calls until the model answers in
//! plain text. Every proposed tool call passes through the turn protocol
//! first; any stage failure aborts the whole turn — partial results are
//! never presented.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::artifact::{reconcile, ArtifactEntry};
use crate::agent::prompts::SYSTEM_PROMPT;
use crate::agent::protocol::TurnProtocol;
use crate::agent::tools::{dispatch, tool_specs};
use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::state::AppState;

/// A prior message replayed by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub role: String,
    pub content: String,
}

/// The completed turn: assistant text plus, when a search ran, the
/// reconciled candidate list in presentation order.
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<ArtifactEntry>>,
}

/// Runs one conversational turn to completion.
pub async fn run_turn(
    state: &AppState,
    history: &[IncomingMessage],
) -> Result<TurnResponse, AppError> {
    let mut log = build_log(history)?;
    let mut protocol = TurnProtocol::new();
    let specs = tool_specs();

    loop {
        let turn = state
            .llm
            .chat(&log, &specs)
            .await
            .map_err(|e| AppError::Llm(format!("controller call failed: {e}")))?;

        if turn.has_tool_calls() {
            let calls = turn.tool_calls.clone().unwrap_or_default();
            log.push(ChatMessage::assistant_calls(turn.content.clone(), calls.clone()));

            for call in &calls {
                debug!("controller proposed `{}`", call.function.name);
                let result = match dispatch(call, state, &mut protocol).await {
                    Ok(value) => value,
                    Err(e) => {
                        protocol.abort();
                        return Err(e);
                    }
                };
                log.push(ChatMessage::tool_result(
                    &call.id,
                    &call.function.name,
                    result.to_string(),
                ));
            }
            continue;
        }

        let reply = turn.content.unwrap_or_default();
        let outcome = protocol.finish()?;

        let candidates = outcome.scored.map(|scored| {
            let raw = outcome.retrieved.unwrap_or_default();
            reconcile(&scored, &raw)
        });
        if let Some(list) = &candidates {
            info!("turn complete with {} ranked candidates", list.len());
        }

        return Ok(TurnResponse { reply, candidates });
    }
}

fn build_log(history: &[IncomingMessage]) -> Result<Vec<ChatMessage>, AppError> {
    let mut log = Vec::with_capacity(history.len() + 1);
    log.push(ChatMessage::system(SYSTEM_PROMPT));

    for message in history {
        match message.role.as_str() {
            "user" => log.push(ChatMessage::user(&message.content)),
            "assistant" => log.push(ChatMessage::assistant(&message.content)),
            other => {
                return Err(AppError::Validation(format!(
                    "unsupported message role `{other}`"
                )))
            }
        }
    }

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_log_prepends_system_prompt() {
        let history = vec![
            IncomingMessage {
                role: "user".to_string(),
                content: "Find me a React dev".to_string(),
            },
            IncomingMessage {
                role: "assistant".to_string(),
                content: "On it.".to_string(),
            },
        ];

        let log = build_log(&history).unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].role, "system");
        assert_eq!(log[1].role, "user");
        assert_eq!(log[2].role, "assistant");
    }

    #[test]
    fn test_build_log_rejects_unknown_roles() {
        let history = vec![IncomingMessage {
            role: "tool".to_string(),
            content: "{}".to_string(),
        }];

        assert!(matches!(
            build_log(&history),
            Err(AppError::Validation(_))
        ));
    }
}
