use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::search::index::{CandidateIndex, ProfileStore};
use crate::search::scoring::ScoringWeights;

/// Shared application state injected into all route handlers via Axum
/// extractors. The index and profile store sit behind trait objects so
/// the pipeline can run against in-memory fakes in tests.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub config: Config,
    /// Match-score weights, validated at startup to sum to 1.0.
    pub weights: ScoringWeights,
    pub index: Arc<dyn CandidateIndex>,
    pub profiles: Arc<dyn ProfileStore>,
}
