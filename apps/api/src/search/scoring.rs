//! Scoring & reasoning — a closed-form weighted formula plus a
//! deterministic one-sentence rationale. No learned ranker: identical
//! inputs always produce identical scores, so rankings are auditable.

use std::cmp::Ordering;
use std::collections::HashSet;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::models::candidate::{CandidateRecord, ScoredCandidate, StructuredQuery};

/// Match-score weights. Must sum to 1.0; validated at construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub similarity: f64,
    pub experience: f64,
    pub skills: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            similarity: 0.40,
            experience: 0.35,
            skills: 0.25,
        }
    }
}

impl ScoringWeights {
    pub fn new(similarity: f64, experience: f64, skills: f64) -> Result<Self> {
        ensure!(
            similarity >= 0.0 && experience >= 0.0 && skills >= 0.0,
            "match-score weights must be non-negative"
        );
        let sum = similarity + experience + skills;
        ensure!(
            (sum - 1.0).abs() < 1e-9,
            "match-score weights must sum to 1.0, got {sum}"
        );
        Ok(Self {
            similarity,
            experience,
            skills,
        })
    }
}

/// Experience fit on a 0–100 scale.
///
/// The curve has a sweet spot at the requirement, not a "more is better"
/// slope: exact match scores 100, each year over shaves 5 points through
/// the modest band, and 5+ years over lands in the 60–75 over-qualification
/// band. Under the requirement the score decays proportionally to the
/// shortfall, floored at 0. No requirement at all fits everyone.
pub fn experience_fit(required_years: u32, actual_years: u32) -> f64 {
    if required_years == 0 {
        return 100.0;
    }
    if actual_years < required_years {
        return f64::from(actual_years) / f64::from(required_years) * 100.0;
    }
    let over = actual_years - required_years;
    match over {
        0 => 100.0,
        1..=4 => 100.0 - 5.0 * f64::from(over),
        _ => (75.0 - 3.0 * f64::from(over - 5)).max(60.0),
    }
}

/// Fraction of required skills the candidate covers, on a 0–100 scale.
/// An empty requirement set is full alignment for every candidate.
pub fn skills_alignment(candidate_skills: &[String], required_skills: &[String]) -> f64 {
    let required: HashSet<String> = required_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if required.is_empty() {
        return 100.0;
    }

    let held: HashSet<String> = candidate_skills.iter().map(|s| s.to_lowercase()).collect();
    let matched = required.iter().filter(|s| held.contains(*s)).count();
    matched as f64 / required.len() as f64 * 100.0
}

/// Scores and orders candidates against the structured query.
///
/// Output is sorted by match_score descending; equal scores keep their
/// incoming retrieval order (stable sort). Empty input yields empty output.
pub fn score_candidates(
    query: &StructuredQuery,
    candidates: &[CandidateRecord],
    weights: &ScoringWeights,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|record| score_one(query, record, weights))
        .collect();

    scored.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });
    scored
}

fn score_one(
    query: &StructuredQuery,
    record: &CandidateRecord,
    weights: &ScoringWeights,
) -> ScoredCandidate {
    let similarity_pct = record.similarity.clamp(0.0, 1.0) * 100.0;
    let experience_pct = experience_fit(query.min_years_experience, record.total_years_experience);
    let skills_pct = skills_alignment(&record.skill_list, &query.required_skills);

    let raw = weights.similarity * similarity_pct
        + weights.experience * experience_pct
        + weights.skills * skills_pct;

    ScoredCandidate {
        record: record.clone(),
        match_score: round_one_decimal(raw),
        reasoning: build_reasoning(query, record, similarity_pct, skills_pct),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One short sentence naming the factors behind the score. Built only
/// from the candidate's record and the query — nothing else to fabricate
/// facts from.
fn build_reasoning(
    query: &StructuredQuery,
    record: &CandidateRecord,
    similarity_pct: f64,
    skills_pct: f64,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    let required_count = query.required_skills.len();
    if required_count > 0 {
        if skills_pct >= 100.0 {
            parts.push(format!("covers all {required_count} required skills"));
        } else if skills_pct > 0.0 {
            let matched = (skills_pct / 100.0 * required_count as f64).round() as usize;
            parts.push(format!("covers {matched}/{required_count} required skills"));
        } else {
            parts.push("misses the required skills".to_string());
        }
    }

    let required_years = query.min_years_experience;
    if required_years > 0 {
        let actual = record.total_years_experience;
        if actual < required_years {
            parts.push(format!("below the {required_years}-year bar"));
        } else if actual >= required_years + 5 {
            parts.push(format!("well past the {required_years}-year bar"));
        } else {
            parts.push("seniority on target".to_string());
        }
    }

    if similarity_pct >= 75.0 {
        parts.push("strong profile match".to_string());
    } else if similarity_pct >= 45.0 {
        parts.push("fair profile match".to_string());
    } else {
        parts.push("weak profile match".to_string());
    }

    let mut sentence = parts.join(", ");
    if let Some(first) = sentence.get(..1) {
        let capitalized = first.to_uppercase();
        sentence.replace_range(..1, &capitalized);
    }
    sentence.push('.');
    sentence
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn query(min_years: u32, skills: &[&str]) -> StructuredQuery {
        StructuredQuery {
            semantic_query: "Senior React dev with Fintech".to_string(),
            min_years_experience: min_years,
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            location: None,
        }
    }

    fn candidate(similarity: f64, years: u32, skills: &[&str]) -> CandidateRecord {
        CandidateRecord {
            user_id: Uuid::new_v4(),
            similarity,
            total_years_experience: years,
            skill_list: skills.iter().map(|s| s.to_string()).collect(),
            name: None,
            location: None,
            profile_picture_url: None,
        }
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        assert!(ScoringWeights::new(0.40, 0.35, 0.25).is_ok());
        assert!(ScoringWeights::new(0.5, 0.5, 0.5).is_err());
        assert!(ScoringWeights::new(-0.2, 0.7, 0.5).is_err());
    }

    #[test]
    fn test_default_weights_are_valid() {
        let w = ScoringWeights::default();
        assert!(ScoringWeights::new(w.similarity, w.experience, w.skills).is_ok());
    }

    #[test]
    fn test_experience_fit_exact_requirement_is_sweet_spot() {
        assert_eq!(experience_fit(3, 3), 100.0);
    }

    #[test]
    fn test_experience_fit_slightly_over_decays_gently() {
        assert_eq!(experience_fit(3, 4), 95.0);
        assert_eq!(experience_fit(3, 7), 80.0);
    }

    #[test]
    fn test_experience_fit_overqualified_lands_in_band() {
        let fit = experience_fit(3, 9);
        assert!((60.0..=75.0).contains(&fit), "fit was {fit}");
        // 10+ years over still never drops below the band floor
        assert_eq!(experience_fit(3, 40), 60.0);
    }

    #[test]
    fn test_experience_fit_underqualified_decays_proportionally() {
        assert!(experience_fit(5, 2) < experience_fit(5, 4));
        assert_eq!(experience_fit(5, 0), 0.0);
        assert_eq!(experience_fit(4, 2), 50.0);
    }

    #[test]
    fn test_experience_fit_no_requirement_fits_everyone() {
        assert_eq!(experience_fit(0, 0), 100.0);
        assert_eq!(experience_fit(0, 25), 100.0);
    }

    #[test]
    fn test_skills_alignment_empty_requirements_is_full() {
        assert_eq!(skills_alignment(&[], &[]), 100.0);
        assert_eq!(
            skills_alignment(&["Rust".to_string(), "Go".to_string()], &[]),
            100.0
        );
    }

    #[test]
    fn test_skills_alignment_is_case_insensitive() {
        let held = vec!["react".to_string(), "typescript".to_string()];
        let required = vec!["React".to_string(), "TypeScript".to_string()];
        assert_eq!(skills_alignment(&held, &required), 100.0);
    }

    #[test]
    fn test_skills_alignment_partial_overlap() {
        let held = vec!["React".to_string(), "TypeScript".to_string()];
        let required = vec![
            "React".to_string(),
            "TypeScript".to_string(),
            "Node.js".to_string(),
        ];
        let alignment = skills_alignment(&held, &required);
        assert!((alignment - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_worked_example_scores_82_7() {
        // similarity 0.82, 4 years against a 3-year bar, 2 of 3 skills:
        // 0.40*82 + 0.35*95 + 0.25*66.7 = 82.7 after rounding.
        let q = query(3, &["React", "TypeScript", "Node.js"]);
        let c = candidate(0.82, 4, &["React", "TypeScript"]);

        let scored = score_candidates(&q, &[c], &ScoringWeights::default());
        assert_eq!(scored[0].match_score, 82.7);
    }

    #[test]
    fn test_score_is_deterministic() {
        let q = query(3, &["React", "TypeScript"]);
        let c = candidate(0.64, 6, &["React"]);

        let first = score_candidates(&q, &[c.clone()], &ScoringWeights::default());
        let second = score_candidates(&q, &[c], &ScoringWeights::default());
        assert_eq!(first[0].match_score, second[0].match_score);
        assert_eq!(first[0].reasoning, second[0].reasoning);
    }

    #[test]
    fn test_output_ordered_by_match_score_descending() {
        let q = query(3, &["Rust"]);
        let candidates = vec![
            candidate(0.20, 1, &[]),
            candidate(0.95, 3, &["Rust"]),
            candidate(0.55, 4, &["Rust"]),
        ];

        let scored = score_candidates(&q, &candidates, &ScoringWeights::default());
        for pair in scored.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
        assert_eq!(scored[0].record.similarity, 0.95);
    }

    #[test]
    fn test_equal_scores_keep_retrieval_order() {
        let q = query(3, &["Rust"]);
        let first = candidate(0.70, 3, &["Rust"]);
        let second = candidate(0.70, 3, &["Rust"]);
        let ids = (first.user_id, second.user_id);

        let scored = score_candidates(&q, &[first, second], &ScoringWeights::default());
        assert_eq!(scored[0].match_score, scored[1].match_score);
        assert_eq!(scored[0].record.user_id, ids.0);
        assert_eq!(scored[1].record.user_id, ids.1);
    }

    #[test]
    fn test_empty_candidates_yield_empty_output() {
        let q = query(3, &["Rust"]);
        assert!(score_candidates(&q, &[], &ScoringWeights::default()).is_empty());
    }

    #[test]
    fn test_match_score_never_copies_similarity() {
        // A perfect-similarity candidate with no skills and no experience
        // must not score 100.
        let q = query(5, &["Rust"]);
        let c = candidate(1.0, 0, &[]);

        let scored = score_candidates(&q, &[c], &ScoringWeights::default());
        assert_eq!(scored[0].match_score, 40.0);
    }

    #[test]
    fn test_reasoning_names_driving_factors() {
        let q = query(3, &["React", "TypeScript", "Node.js"]);
        let c = candidate(0.82, 4, &["React", "TypeScript"]);

        let scored = score_candidates(&q, &[c], &ScoringWeights::default());
        let reasoning = &scored[0].reasoning;
        assert!(reasoning.contains("2/3"), "reasoning was: {reasoning}");
        assert!(reasoning.contains("seniority on target"));
        assert!(reasoning.contains("strong profile match"));
        // One short sentence, roughly a dozen words.
        assert!(reasoning.split_whitespace().count() <= 14);
    }

    #[test]
    fn test_reasoning_for_empty_criteria_query() {
        let q = query(0, &[]);
        let c = candidate(0.9, 2, &["Go"]);

        let scored = score_candidates(&q, &[c], &ScoringWeights::default());
        assert_eq!(scored[0].reasoning, "Strong profile match.");
    }
}
