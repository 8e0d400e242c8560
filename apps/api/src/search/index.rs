//! Collaborator seams for retrieval: the embedding service, the candidate
//! search index, and the profile store. Each is a trait held in `AppState`
//! so the pipeline can be exercised against in-memory fakes.

use std::collections::HashMap;

use async_trait::async_trait;
use pgvector::Vector;
use sqlx::PgPool;
use uuid::Uuid;

use crate::llm_client::LlmClient;
use crate::models::candidate::CandidateHit;
use crate::models::profile::ProfileRow;
use crate::search::retrieval::RetrievalError;

/// Converts text to a fixed-length dense vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
}

#[async_trait]
impl Embedder for LlmClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        LlmClient::embed(self, text)
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))
    }
}

/// The persisted candidate search index. Combines the hard filter
/// (years >= min, all required skills present) with a cosine-similarity
/// shortlist; callers never re-filter client-side. Rows come back ordered
/// by similarity descending.
#[async_trait]
pub trait CandidateIndex: Send + Sync {
    async fn search(
        &self,
        query_vector: Vec<f32>,
        min_years: u32,
        required_skills: &[String],
        limit: i64,
    ) -> Result<Vec<CandidateHit>, RetrievalError>;
}

/// Display attributes keyed by user_id. The join is by key, not position;
/// the map carries no ordering guarantee.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profiles_by_ids(
        &self,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, ProfileRow>, RetrievalError>;
}

/// pgvector-backed index: the filter + ranking live in the
/// `search_candidates` SQL function.
pub struct PgCandidateIndex {
    pool: PgPool,
}

impl PgCandidateIndex {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateIndex for PgCandidateIndex {
    async fn search(
        &self,
        query_vector: Vec<f32>,
        min_years: u32,
        required_skills: &[String],
        limit: i64,
    ) -> Result<Vec<CandidateHit>, RetrievalError> {
        // Skill containment is compared lowercased on both sides.
        let skills_lower: Vec<String> = required_skills.iter().map(|s| s.to_lowercase()).collect();

        sqlx::query_as::<_, CandidateHit>(
            "SELECT user_id, similarity, total_yoe, skill_list \
             FROM search_candidates($1, $2, $3, $4)",
        )
        .bind(Vector::from(query_vector))
        .bind(min_years as i32)
        .bind(&skills_lower)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RetrievalError::Index(e.to_string()))
    }
}

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn profiles_by_ids(
        &self,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, ProfileRow>, RetrievalError> {
        let rows: Vec<ProfileRow> = sqlx::query_as(
            "SELECT user_id, name, location, profile_picture_url \
             FROM profiles WHERE user_id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RetrievalError::ProfileJoin(e.to_string()))?;

        Ok(rows.into_iter().map(|r| (r.user_id, r)).collect())
    }
}
