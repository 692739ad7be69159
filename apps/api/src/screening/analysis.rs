//! Single-candidate analysis: one résumé, one job description, one verdict.

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::info;

use crate::errors::AppError;
use crate::screening::models::CandidateAnalysis;
use crate::screening::oracle::ScreeningOracle;

const FALLBACK_NAME: &str = "Candidate";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Name typed by the recruiter; used only if the model finds none.
    #[serde(default)]
    pub candidate_name: Option<String>,
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub candidate_name: String,
    pub analysis: CandidateAnalysis,
}

pub async fn analyze_single(
    oracle: &dyn ScreeningOracle,
    permits: &Semaphore,
    request: AnalyzeRequest,
) -> Result<AnalyzeResponse, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let analysis = {
        let _permit = permits
            .acquire()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("oracle permits closed: {e}")))?;
        oracle
            .analyze(&request.resume_text, &request.job_description)
            .await
            .map_err(|e| AppError::Llm(format!("Candidate analysis failed: {e}")))?
    };

    let candidate_name = resolve_name(&analysis, request.candidate_name.as_deref());
    info!(
        "Analyzed {}: {:?} ({}/100)",
        candidate_name, analysis.recommendation, analysis.confidence_score
    );

    Ok(AnalyzeResponse {
        candidate_name,
        analysis,
    })
}

fn resolve_name(analysis: &CandidateAnalysis, typed: Option<&str>) -> String {
    analysis
        .display_name()
        .or_else(|| typed.map(str::trim).filter(|n| !n.is_empty()))
        .unwrap_or(FALLBACK_NAME)
        .to_string()
}
