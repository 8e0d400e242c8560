//! Retrieval — embeds the semantic query, asks the candidate index for a
//! filtered similarity shortlist, then joins display attributes from the
//! profile store without disturbing the index's ordering.

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::candidate::{CandidateRecord, StructuredQuery};
use crate::search::index::{CandidateIndex, Embedder, ProfileStore};

/// Retrieval never requests unbounded result sets from the index.
pub const DEFAULT_RETRIEVAL_LIMIT: i64 = 20;

/// A collaborator call failed. Surfaced to the orchestration layer and
/// fatal to the turn — an empty candidate list is reserved for genuine
/// zero-match results.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("candidate index search failed: {0}")]
    Index(String),

    #[error("profile lookup failed: {0}")]
    ProfileJoin(String),
}

/// Runs the retrieval stage for one structured query.
///
/// An empty-criteria query still retrieves: no skill filter, a zero-year
/// floor, and whatever the embedding of the (possibly empty) summary
/// ranks as broadly relevant.
pub async fn retrieve(
    query: &StructuredQuery,
    limit: i64,
    embedder: &dyn Embedder,
    index: &dyn CandidateIndex,
    profiles: &dyn ProfileStore,
) -> Result<Vec<CandidateRecord>, RetrievalError> {
    let query_vector = embedder.embed(&query.semantic_query).await?;

    let hits = index
        .search(
            query_vector,
            query.min_years_experience,
            &query.required_skills,
            limit,
        )
        .await?;

    debug!("candidate index returned {} hits", hits.len());
    if hits.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<_> = hits.iter().map(|h| h.user_id).collect();
    let mut profile_map = profiles.profiles_by_ids(&ids).await?;

    // Join preserves the index's similarity ordering. A hit whose profile
    // row has drifted away is kept with display fields unset — dropping it
    // would shrink the ranked set and break positional invariants.
    let records = hits
        .into_iter()
        .map(|hit| {
            let profile = profile_map.remove(&hit.user_id);
            if profile.is_none() {
                warn!("no profile row for indexed candidate {}", hit.user_id);
            }
            CandidateRecord {
                user_id: hit.user_id,
                similarity: hit.similarity,
                total_years_experience: hit.total_yoe.max(0) as u32,
                skill_list: hit.skill_list,
                name: profile.as_ref().and_then(|p| p.name.clone()),
                location: profile.as_ref().and_then(|p| p.location.clone()),
                profile_picture_url: profile.and_then(|p| p.profile_picture_url),
            }
        })
        .collect();

    Ok(records)
}
