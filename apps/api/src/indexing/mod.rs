//! Embedding generation — the asynchronous write path that populates the
//! candidate search index the retrieval stage reads.
//!
//! Fired by a webhook when a profile is created or updated: summarize the
//! parsed résumé, embed the summary, upsert one row keyed by user_id.
//! Eventually consistent; retrieval tolerates slightly stale rows.

pub mod handlers;
pub mod prompts;

use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::indexing::prompts::{PROFILE_SUMMARY_PROMPT_TEMPLATE, PROFILE_SUMMARY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::profile::ProfileUpsert;

/// Hard cap on the stored summary text.
pub const SUMMARY_MAX_CHARS: usize = 1000;

#[derive(Debug, Serialize)]
pub struct IndexedProfile {
    pub user_id: uuid::Uuid,
    pub summary_chars: usize,
    pub skills_indexed: usize,
    pub indexed_at: DateTime<Utc>,
}

/// Summarizes, embeds, and upserts one candidate into the search index.
pub async fn index_profile(
    profile: &ProfileUpsert,
    llm: &LlmClient,
    pool: &PgPool,
) -> Result<IndexedProfile, AppError> {
    let resume_json = profile
        .parsed_resume
        .as_ref()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "{}".to_string());

    let prompt = PROFILE_SUMMARY_PROMPT_TEMPLATE.replace("{profile_json}", &resume_json);
    let summary = llm
        .complete(&prompt, PROFILE_SUMMARY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Profile summary failed: {e}")))?;
    let summary = truncate_summary(&summary);

    let embedding = llm
        .embed(&summary)
        .await
        .map_err(|e| AppError::Llm(format!("Profile embedding failed: {e}")))?;

    let skills = profile.skill_names();
    let total_yoe = i32::try_from(profile.total_yoe.unwrap_or(0)).unwrap_or(i32::MAX);

    let (indexed_at,): (DateTime<Utc>,) = sqlx::query_as(
        "INSERT INTO candidate_search_index \
             (user_id, summary_text, embedding, total_yoe, skill_list, updated_at) \
         VALUES ($1, $2, $3, $4, $5, now()) \
         ON CONFLICT (user_id) DO UPDATE SET \
             summary_text = excluded.summary_text, \
             embedding = excluded.embedding, \
             total_yoe = excluded.total_yoe, \
             skill_list = excluded.skill_list, \
             updated_at = now() \
         RETURNING updated_at",
    )
    .bind(profile.user_id)
    .bind(&summary)
    .bind(Vector::from(embedding))
    .bind(total_yoe)
    .bind(&skills)
    .fetch_one(pool)
    .await?;

    info!(
        user_id = %profile.user_id,
        skills = skills.len(),
        "candidate indexed"
    );

    Ok(IndexedProfile {
        user_id: profile.user_id,
        summary_chars: summary.chars().count(),
        skills_indexed: skills.len(),
        indexed_at,
    })
}

fn truncate_summary(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        text.to_string()
    } else {
        text.chars().take(SUMMARY_MAX_CHARS).collect()
    }
}
