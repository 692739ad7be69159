//! Leaderboard ordering for a batch run.
//!
//! Ordering: analysed candidates first, by descending confidence score.
//! Candidates without an analysis (pending, failed, cancelled) follow in
//! their original order. The sort is stable, so equal scores keep input order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::screening::batch::BatchCandidateResult;

const PODIUM_SIZE: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    /// 1-based.
    pub rank: usize,
    pub candidate: BatchCandidateResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub podium: Vec<RankedCandidate>,
    pub contenders: Vec<RankedCandidate>,
}

impl Leaderboard {
    pub fn from_results(results: &[BatchCandidateResult]) -> Self {
        let mut ranked = rank(results);
        let contenders = ranked.split_off(ranked.len().min(PODIUM_SIZE));
        Self {
            podium: ranked,
            contenders,
        }
    }
}

pub fn rank(results: &[BatchCandidateResult]) -> Vec<RankedCandidate> {
    let mut sorted: Vec<&BatchCandidateResult> = results.iter().collect();
    sorted.sort_by(|a, b| compare_for_rank(a, b));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, candidate)| RankedCandidate {
            rank: i + 1,
            candidate: candidate.clone(),
        })
        .collect()
}

fn compare_for_rank(a: &BatchCandidateResult, b: &BatchCandidateResult) -> Ordering {
    match (a.analysis(), b.analysis()) {
        (Some(a), Some(b)) => b
            .confidence_score
            .partial_cmp(&a.confidence_score)
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
