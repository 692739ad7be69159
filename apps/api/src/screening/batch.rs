//! Batch Runner — screens staged résumés one after another against one job description.
//!
//! Each candidate moves through `Pending → Processing → {Completed | Error}`.
//! The runner owns the result vector for the whole run and publishes a fresh
//! `BatchSnapshot` on a `watch` channel after every transition; readers never
//! touch the live state.
//!
//! The loop is strictly sequential. Oracle calls additionally take a permit
//! from the shared inference semaphore so that batch runs and ad-hoc analyses
//! together never exceed the configured concurrency against the service.
//!
//! Cancellation is cooperative: the flag is checked before each candidate
//! starts. An analysis already in flight always finishes; candidates that
//! never started become `Cancelled`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{watch, Semaphore};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::screening::intake::CandidateFile;
use crate::screening::models::CandidateAnalysis;
use crate::screening::oracle::{AnalysisError, ScreeningOracle};

// ────────────────────────────────────────────────────────────────────────────
// Per-candidate state machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Pending,
    Processing,
    Completed,
    Error,
    /// Only reachable from `Pending`, only in cancelled runs.
    Cancelled,
}

impl CandidateStatus {
    fn can_become(self, next: CandidateStatus) -> bool {
        use CandidateStatus::*;
        matches!(
            (self, next),
            (Pending, Processing) | (Processing, Completed) | (Processing, Error) | (Pending, Cancelled)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("illegal status transition {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: CandidateStatus,
    pub to: CandidateStatus,
}

/// One staged file's outcome within a run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchCandidateResult {
    pub id: Uuid,
    pub file_name: String,
    /// Kept for duels after the run. Shared across snapshots and left out of responses.
    #[serde(skip_serializing)]
    pub resume_content: Arc<str>,
    analysis: Option<CandidateAnalysis>,
    status: CandidateStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl BatchCandidateResult {
    pub fn pending(file: CandidateFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file.name,
            resume_content: file.content.into(),
            analysis: None,
            status: CandidateStatus::Pending,
            error: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn status(&self) -> CandidateStatus {
        self.status
    }

    pub fn analysis(&self) -> Option<&CandidateAnalysis> {
        self.analysis.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Extracted name when available, else the file name.
    pub fn display_name(&self) -> &str {
        self.analysis
            .as_ref()
            .and_then(|a| a.display_name())
            .unwrap_or(&self.file_name)
    }

    pub fn begin(&mut self) -> Result<(), TransitionError> {
        self.transition(CandidateStatus::Processing)?;
        self.started_at = Some(Utc::now());
        Ok(())
    }

    pub fn complete(&mut self, analysis: CandidateAnalysis) -> Result<(), TransitionError> {
        self.transition(CandidateStatus::Completed)?;
        self.analysis = Some(analysis);
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(CandidateStatus::Error)?;
        self.error = Some(message.into());
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.transition(CandidateStatus::Cancelled)
    }

    fn transition(&mut self, next: CandidateStatus) -> Result<(), TransitionError> {
        if !self.status.can_become(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Run-level state
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    /// Candidates finished so far, successfully or not.
    pub current: usize,
    /// Fixed at run start.
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Read-only view of a run, published after every transition.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSnapshot {
    pub state: RunState,
    pub progress: BatchProgress,
    pub results: Vec<BatchCandidateResult>,
}

impl BatchSnapshot {
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn find(&self, id: Uuid) -> Option<&BatchCandidateResult> {
        self.results.iter().find(|r| r.id == id)
    }
}

/// Cooperative cancellation shared between a run and its controller.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Runner
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct BatchRunner {
    oracle: Arc<dyn ScreeningOracle>,
    permits: Arc<Semaphore>,
}

impl BatchRunner {
    pub fn new(oracle: Arc<dyn ScreeningOracle>, permits: Arc<Semaphore>) -> Self {
        Self { oracle, permits }
    }

    /// Runs the whole batch and returns the final snapshot (also published on `snapshots`).
    ///
    /// A failed candidate never aborts the batch: its error is recorded and
    /// the loop moves on to the next file.
    pub async fn run(
        &self,
        files: Vec<CandidateFile>,
        job_description: &str,
        snapshots: &watch::Sender<BatchSnapshot>,
        cancel: &CancelFlag,
    ) -> BatchSnapshot {
        let mut results: Vec<BatchCandidateResult> =
            files.into_iter().map(BatchCandidateResult::pending).collect();
        let mut progress = BatchProgress {
            current: 0,
            total: results.len(),
        };
        publish(snapshots, RunState::Running, progress, &results);
        info!("Batch run started: {} candidates", progress.total);

        for index in 0..results.len() {
            if cancel.is_cancelled() {
                warn!(
                    "Batch run cancelled after {}/{} candidates",
                    progress.current, progress.total
                );
                for pending in &mut results[index..] {
                    log_transition(pending.cancel(), &pending.file_name);
                }
                return publish(snapshots, RunState::Cancelled, progress, &results);
            }

            log_transition(results[index].begin(), &results[index].file_name);
            publish(snapshots, RunState::Running, progress, &results);

            let outcome = self
                .analyze(&results[index].resume_content, job_description)
                .await;

            let candidate = &mut results[index];
            match outcome {
                Ok(analysis) => {
                    info!(
                        "Candidate {}/{} ({}) completed: {:?} {}/100",
                        index + 1,
                        progress.total,
                        candidate.file_name,
                        analysis.recommendation,
                        analysis.confidence_score
                    );
                    log_transition(candidate.complete(analysis), &candidate.file_name);
                }
                Err(e) => {
                    warn!(
                        "Candidate {}/{} ({}) failed: {e}",
                        index + 1,
                        progress.total,
                        candidate.file_name
                    );
                    log_transition(candidate.fail(e.to_string()), &candidate.file_name);
                }
            }

            progress.current += 1;
            publish(snapshots, RunState::Running, progress, &results);
        }

        info!("Batch run finished: {} candidates", progress.total);
        publish(snapshots, RunState::Completed, progress, &results)
    }

    async fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<CandidateAnalysis, AnalysisError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AnalysisError::Remote("inference capacity is shut down".to_string()))?;
        self.oracle.analyze(resume_text, job_description).await
    }
}

fn publish(
    snapshots: &watch::Sender<BatchSnapshot>,
    state: RunState,
    progress: BatchProgress,
    results: &[BatchCandidateResult],
) -> BatchSnapshot {
    let snapshot = BatchSnapshot {
        state,
        progress,
        results: results.to_vec(),
    };
    snapshots.send_replace(snapshot.clone());
    snapshot
}

fn log_transition(result: Result<(), TransitionError>, file_name: &str) {
    if let Err(e) = result {
        error!("Batch state machine violated for {file_name}: {e}");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A finished candidate, for ranking and selection tests.
    pub fn completed(file_name: &str, analysis: CandidateAnalysis) -> BatchCandidateResult {
        let mut result = BatchCandidateResult::pending(CandidateFile::new(file_name, file_name));
        result.begin().unwrap();
        result.complete(analysis).unwrap();
        result
    }

    pub fn errored(file_name: &str) -> BatchCandidateResult {
        let mut result = BatchCandidateResult::pending(CandidateFile::new(file_name, file_name));
        result.begin().unwrap();
        result.fail("boom").unwrap();
        result
    }
}
