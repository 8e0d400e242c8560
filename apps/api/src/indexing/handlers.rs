use axum::{extract::State, http::HeaderMap, Json};

use crate::errors::AppError;
use crate::indexing::{index_profile, IndexedProfile};
use crate::models::profile::ProfileWebhookPayload;
use crate::state::AppState;

const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// POST /api/v1/webhooks/generate-embeddings
/// Fired by the profile store on create/update. Authenticated by a shared
/// secret header.
pub async fn handle_generate_embeddings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ProfileWebhookPayload>,
) -> Result<Json<IndexedProfile>, AppError> {
    if !secret_matches(&headers, &state.config.webhook_secret) {
        return Err(AppError::Unauthorized);
    }

    let indexed = index_profile(&payload.record, &state.llm, &state.db).await?;
    Ok(Json(indexed))
}

fn secret_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        == Some(expected)
}
