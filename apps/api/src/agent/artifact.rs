//! Presentation adapter input — one display-ready list reconciled from
//! the scored sequence and the raw retrieval sequence.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::models::candidate::{CandidateRecord, ScoredCandidate};

/// A candidate view for the artifact panel. Score and reasoning are
/// present only for candidates the scoring stage covered.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactEntry {
    #[serde(flatten)]
    pub record: CandidateRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Merges the two sequences by user_id. The scored, ordered view takes
/// precedence; raw-only candidates are appended after it, unscored.
pub fn reconcile(scored: &[ScoredCandidate], raw: &[CandidateRecord]) -> Vec<ArtifactEntry> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut entries: Vec<ArtifactEntry> = Vec::with_capacity(scored.len());

    for s in scored {
        if seen.insert(s.record.user_id) {
            entries.push(ArtifactEntry {
                record: s.record.clone(),
                match_score: Some(s.match_score),
                reasoning: Some(s.reasoning.clone()),
            });
        }
    }

    for r in raw {
        if seen.insert(r.user_id) {
            entries.push(ArtifactEntry {
                record: r.clone(),
                match_score: None,
                reasoning: None,
            });
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(similarity: f64) -> CandidateRecord {
        CandidateRecord {
            user_id: Uuid::new_v4(),
            similarity,
            total_years_experience: 4,
            skill_list: vec![],
            name: None,
            location: None,
            profile_picture_url: None,
        }
    }

    fn scored(record: CandidateRecord, match_score: f64) -> ScoredCandidate {
        ScoredCandidate {
            record,
            match_score,
            reasoning: "Seniority on target.".to_string(),
        }
    }

    #[test]
    fn test_scored_view_takes_precedence_and_leads() {
        let a = record(0.9);
        let b = record(0.8);
        let raw = vec![a.clone(), b.clone()];
        // Scoring reordered: b now outranks a.
        let scored_list = vec![scored(b.clone(), 95.0), scored(a.clone(), 90.0)];

        let entries = reconcile(&scored_list, &raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].record.user_id, b.user_id);
        assert_eq!(entries[0].match_score, Some(95.0));
        assert_eq!(entries[1].record.user_id, a.user_id);
    }

    #[test]
    fn test_unscored_stragglers_are_appended() {
        let a = record(0.9);
        let b = record(0.8);
        let raw = vec![a.clone(), b.clone()];
        let scored_list = vec![scored(a.clone(), 90.0)];

        let entries = reconcile(&scored_list, &raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].record.user_id, b.user_id);
        assert_eq!(entries[1].match_score, None);
        assert_eq!(entries[1].reasoning, None);
    }

    #[test]
    fn test_empty_inputs_reconcile_to_empty() {
        assert!(reconcile(&[], &[]).is_empty());
    }
}
