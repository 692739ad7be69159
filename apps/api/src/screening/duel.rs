//! Duel — head-to-head comparison of the two selected candidates.

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::batch::BatchCandidateResult;
use crate::screening::models::ComparisonResult;
use crate::screening::oracle::{AnalysisError, ComparisonRequest, ScreeningOracle};
use crate::screening::selection::SelectionSet;

#[derive(Debug, Error)]
pub enum DuelError {
    #[error("select exactly two candidates to compare (selected {0})")]
    IncompleteSelection(usize),

    #[error("candidate {0} is not part of this run")]
    UnknownCandidate(Uuid),

    #[error("candidate {0} has no resume content")]
    MissingResume(Uuid),

    #[error("comparison failed: {0}")]
    Oracle(#[from] AnalysisError),
}

impl From<DuelError> for AppError {
    fn from(err: DuelError) -> Self {
        match &err {
            DuelError::IncompleteSelection(_) | DuelError::MissingResume(_) => {
                AppError::Validation(err.to_string())
            }
            DuelError::UnknownCandidate(_) => AppError::NotFound(err.to_string()),
            DuelError::Oracle(e) => AppError::Comparison(e.to_string()),
        }
    }
}

/// Builds the oracle request for the selected pair. Candidate A is the older selection.
pub fn build_request(
    selection: &SelectionSet,
    results: &[BatchCandidateResult],
    job_description: &str,
) -> Result<ComparisonRequest, DuelError> {
    let (id_a, id_b) = selection
        .pair()
        .ok_or(DuelError::IncompleteSelection(selection.len()))?;
    let a = resolve(results, id_a)?;
    let b = resolve(results, id_b)?;

    Ok(ComparisonRequest {
        id_a,
        id_b,
        resume_a: a.resume_content.to_string(),
        name_a: a.display_name().to_string(),
        resume_b: b.resume_content.to_string(),
        name_b: b.display_name().to_string(),
        job_description: job_description.to_string(),
    })
}

fn resolve(results: &[BatchCandidateResult], id: Uuid) -> Result<&BatchCandidateResult, DuelError> {
    let candidate = results
        .iter()
        .find(|r| r.id == id)
        .ok_or(DuelError::UnknownCandidate(id))?;
    if candidate.resume_content.trim().is_empty() {
        return Err(DuelError::MissingResume(id));
    }
    Ok(candidate)
}

/// Runs one comparison. No retry; the caller keeps the selection either way.
pub async fn run_duel(
    oracle: &dyn ScreeningOracle,
    permits: &Semaphore,
    request: &ComparisonRequest,
) -> Result<ComparisonResult, DuelError> {
    let _permit = permits
        .acquire()
        .await
        .map_err(|_| AnalysisError::Remote("inference capacity is shut down".to_string()))?;

    let result = oracle.compare(request).await?;
    info!(
        "Duel {} vs {}: winner {:?} ({})",
        request.name_a, request.name_b, result.winner_id, result.winner_name
    );
    Ok(result)
}
