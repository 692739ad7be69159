//! Screening Oracle — the capability boundary to the inference service.
//!
//! The batch runner, the duel, and single-candidate analysis only ever see
//! `dyn ScreeningOracle`. `LlmScreeningOracle` is the production binding;
//! tests substitute a scripted fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::llm_client::prompts::{COMPLIANCE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::screening::models::{CandidateAnalysis, ComparisonResult};
use crate::screening::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, COMPARISON_PROMPT_TEMPLATE, COMPARISON_SYSTEM,
};

/// Failure of one oracle call. Shared by analysis and comparison.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network, auth, rate-limit or provider error. Not distinguished further.
    #[error("inference call failed: {0}")]
    Remote(String),

    #[error("inference service returned no payload")]
    EmptyPayload,

    #[error("payload does not match the expected schema: {0}")]
    Schema(String),
}

impl From<LlmError> for AnalysisError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => AnalysisError::EmptyPayload,
            LlmError::Parse(e) => AnalysisError::Schema(e.to_string()),
            other => AnalysisError::Remote(other.to_string()),
        }
    }
}

/// Inputs for one duel. A/B order only decides labeling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Candidate ids the request was built from; not sent to the model.
    pub id_a: Uuid,
    pub id_b: Uuid,
    pub resume_a: String,
    pub name_a: String,
    pub resume_b: String,
    pub name_b: String,
    pub job_description: String,
}

#[async_trait]
pub trait ScreeningOracle: Send + Sync {
    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<CandidateAnalysis, AnalysisError>;

    async fn compare(&self, request: &ComparisonRequest)
        -> Result<ComparisonResult, AnalysisError>;
}

/// Oracle backed by the Claude Messages API.
pub struct LlmScreeningOracle {
    llm: LlmClient,
}

impl LlmScreeningOracle {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ScreeningOracle for LlmScreeningOracle {
    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<CandidateAnalysis, AnalysisError> {
        let prompt = build_analysis_prompt(resume_text, job_description);
        let system = format!("{ANALYSIS_SYSTEM} {JSON_ONLY_SYSTEM}");

        let analysis: CandidateAnalysis = self.llm.call_json(&prompt, &system).await?;
        analysis.validate().map_err(AnalysisError::Schema)?;

        debug!(
            "Analysis complete: recommendation={:?}, confidence={}",
            analysis.recommendation, analysis.confidence_score
        );
        Ok(analysis)
    }

    async fn compare(
        &self,
        request: &ComparisonRequest,
    ) -> Result<ComparisonResult, AnalysisError> {
        let prompt = build_comparison_prompt(request);
        let system = format!("{COMPARISON_SYSTEM} {JSON_ONLY_SYSTEM}");

        let result: ComparisonResult = self.llm.call_json(&prompt, &system).await?;
        result.validate().map_err(AnalysisError::Schema)?;
        Ok(result)
    }
}

fn build_analysis_prompt(resume_text: &str, job_description: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE
        .replace("{compliance_instruction}", COMPLIANCE_INSTRUCTION)
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
}

fn build_comparison_prompt(request: &ComparisonRequest) -> String {
    COMPARISON_PROMPT_TEMPLATE
        .replace("{compliance_instruction}", COMPLIANCE_INSTRUCTION)
        .replace("{job_description}", &request.job_description)
        .replace("{name_a}", &request.name_a)
        .replace("{name_b}", &request.name_b)
        .replace("{resume_a}", &request.resume_a)
        .replace("{resume_b}", &request.resume_b)
}

// ────────────────────────────────────────────────────────────────────────────
// Scripted oracle for tests
// ────────────────────────────────────────────────────────────────────────────
