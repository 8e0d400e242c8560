mod agent;
mod config;
mod db;
mod errors;
mod indexing;
mod llm_client;
mod models;
mod routes;
mod search;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::search::index::{PgCandidateIndex, PgProfileStore};
use crate::search::scoring::ScoringWeights;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Authentiq API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (candidate index + profile store + upserts)
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.mistral_api_key.clone());
    info!(
        "LLM client initialized (chat: {}, embed: {})",
        llm_client::CHAT_MODEL,
        llm_client::EMBED_MODEL
    );

    // Match-score weights: 0.40/0.35/0.25 unless overridden via env.
    // Construction validates the sum, so a bad override fails startup.
    let weights = ScoringWeights::new(
        config.weight_similarity,
        config.weight_experience,
        config.weight_skills,
    )?;
    info!(
        "Scoring weights: similarity={} experience={} skills={}",
        weights.similarity, weights.experience, weights.skills
    );

    // Build app state
    let state = AppState {
        index: Arc::new(PgCandidateIndex::new(db.clone())),
        profiles: Arc::new(PgProfileStore::new(db.clone())),
        db,
        llm,
        config: config.clone(),
        weights,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
