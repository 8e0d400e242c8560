use axum::{extract::State, Json};
use serde::Deserialize;

use crate::agent::session::{run_turn, IncomingMessage, TurnResponse};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<IncomingMessage>,
}

/// POST /api/v1/chat
/// Runs one agent turn over the supplied message history.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    if req.messages.is_empty() {
        return Err(AppError::Validation("messages must not be empty".to_string()));
    }
    let response = run_turn(&state, &req.messages).await?;
    Ok(Json(response))
}
