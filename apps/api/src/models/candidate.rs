//! Request-scoped entities of the retrieval-and-ranking pipeline.
//!
//! `StructuredQuery` → `CandidateRecord` → `ScoredCandidate`: each stage
//! consumes the previous stage's output and extends it, never mutates it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Hard cap on the semantic summary produced by query extraction.
pub const SEMANTIC_QUERY_MAX_CHARS: usize = 300;

/// A structured retrieval query distilled from free-text hiring intent.
/// Built once per turn by the extraction stage, immutable afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredQuery {
    /// Dense technical summary of the ideal candidate, capped at 300 chars.
    #[serde(default)]
    pub semantic_query: String,
    /// Minimum years of experience; 0 when not inferable.
    #[serde(default)]
    pub min_years_experience: u32,
    /// Hard skill filter; empty means no skill filter at all.
    #[serde(default)]
    pub required_skills: Vec<String>,
    /// Preferred location; None when the request does not mention one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl StructuredQuery {
    /// Normalizes a freshly extracted or controller-supplied query:
    /// truncates the summary, deduplicates skills case-insensitively
    /// (dropping blanks), and collapses a blank location to None.
    pub fn normalized(mut self) -> Self {
        self.semantic_query = truncate_chars(self.semantic_query.trim(), SEMANTIC_QUERY_MAX_CHARS);

        let mut seen: HashSet<String> = HashSet::new();
        self.required_skills = self
            .required_skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.to_lowercase()))
            .map(|s| s.to_string())
            .collect();

        self.location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from);

        self
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

/// A raw hit from the candidate search index, before the profile join.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateHit {
    pub user_id: Uuid,
    /// Cosine similarity against the query vector, in [0, 1].
    pub similarity: f64,
    pub total_yoe: i32,
    pub skill_list: Vec<String>,
}

/// An enriched retrieval result: index hit plus joined display fields.
/// Immutable once returned from retrieval; scoring only extends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub user_id: Uuid,
    pub similarity: f64,
    pub total_years_experience: u32,
    #[serde(default)]
    pub skill_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

/// A candidate with its computed match score and justification. The only
/// entity with a total ordering: match_score descending, ties broken by
/// retrieval rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub record: CandidateRecord,
    /// Weighted match score in [0, 100], rounded to one decimal place.
    pub match_score: f64,
    /// One-sentence justification naming the factors driving the score.
    pub reasoning: String,
}
