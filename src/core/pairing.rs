use crate::models::{DomainCandidateScore, PreferencePair};

/// Minimum combined-score gap (1-10 scale) for a pair to count as signal
pub const DEFAULT_PAIRING_MARGIN: f64 = 0.5;

/// Sort candidates by combined score, highest first
///
/// The sort is stable, so tied candidates keep their extraction order.
pub fn rank_candidates(candidates: &[DomainCandidateScore]) -> Vec<&DomainCandidateScore> {
    let mut ranked: Vec<&DomainCandidateScore> = candidates.iter().collect();
    ranked.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Pair the best candidate against every candidate it beats by more than `margin`
///
/// Only the top-ranked candidate is ever chosen. Fewer than two candidates
/// produce no pairs.
pub fn build_preference_pairs(
    prompt: &str,
    candidates: &[DomainCandidateScore],
    margin: f64,
) -> Vec<PreferencePair> {
    if candidates.len() < 2 {
        return Vec::new();
    }

    let ranked = rank_candidates(candidates);
    let best = ranked[0];

    ranked[1..]
        .iter()
        .filter(|other| best.combined_score - other.combined_score > margin)
        .map(|other| PreferencePair {
            prompt: prompt.to_string(),
            chosen: best.domain.clone(),
            rejected: other.domain.clone(),
            chosen_score: best.combined_score,
            rejected_score: other.combined_score,
        })
        .collect()
}
