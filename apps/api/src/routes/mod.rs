pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agent::handlers as agent_handlers;
use crate::indexing::handlers as indexing_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Agent surface
        .route("/api/v1/chat", post(agent_handlers::handle_chat))
        // Index write path
        .route(
            "/api/v1/webhooks/generate-embeddings",
            post(indexing_handlers::handle_generate_embeddings),
        )
        .with_state(state)
}
