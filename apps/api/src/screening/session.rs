//! Screening sessions — the server-side home of one recruiter's batch.
//!
//! A session carries the job description, the staged files, the latest run
//! (observed through a `watch` receiver), the duel selection and the last
//! comparison. At most one batch run is active per session; mutations that
//! would race the runner are refused with `Conflict`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::batch::{
    BatchCandidateResult, BatchProgress, BatchRunner, BatchSnapshot, CancelFlag, CandidateStatus,
    RunState,
};
use crate::screening::duel;
use crate::screening::intake::{self, CandidateFile};
use crate::screening::models::ComparisonResult;
use crate::screening::oracle::ComparisonRequest;
use crate::screening::selection::SelectionSet;

pub struct ScreeningSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    job_description: String,
    staged: Vec<CandidateFile>,
    /// Job description the current results were produced against.
    run_job_description: Option<String>,
    snapshots: watch::Receiver<BatchSnapshot>,
    cancel: CancelFlag,
    selection: SelectionSet,
    comparison: Option<ComparisonResult>,
}

#[derive(Debug, Serialize)]
pub struct StagedFileView {
    pub index: usize,
    pub name: String,
    pub size_bytes: usize,
}

/// Everything a client needs to render the session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job_description: String,
    pub staged_files: Vec<StagedFileView>,
    pub run: BatchSnapshot,
    pub selection: SelectionSet,
    pub comparison: Option<ComparisonResult>,
}

impl ScreeningSession {
    pub fn new(job_description: Option<String>) -> Self {
        let (_, snapshots) = watch::channel(BatchSnapshot::default());
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            job_description: job_description.unwrap_or_default(),
            staged: Vec::new(),
            run_job_description: None,
            snapshots,
            cancel: CancelFlag::default(),
            selection: SelectionSet::new(),
            comparison: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> BatchSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that observes the current run until it finishes.
    pub fn subscribe(&self) -> watch::Receiver<BatchSnapshot> {
        self.snapshots.clone()
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            created_at: self.created_at,
            job_description: self.job_description.clone(),
            staged_files: self
                .staged
                .iter()
                .enumerate()
                .map(|(index, file)| StagedFileView {
                    index,
                    name: file.name.clone(),
                    size_bytes: file.content.len(),
                })
                .collect(),
            run: self.snapshot(),
            selection: self.selection.clone(),
            comparison: self.comparison.clone(),
        }
    }

    fn is_running(&self) -> bool {
        self.snapshots.borrow().is_running()
    }

    fn ensure_idle(&self, action: &str) -> Result<(), AppError> {
        if self.is_running() {
            return Err(AppError::Conflict(format!(
                "cannot {action} while a batch run is in progress"
            )));
        }
        Ok(())
    }

    // ── Staging ─────────────────────────────────────────────────────────────

    pub fn set_job_description(&mut self, job_description: String) -> Result<(), AppError> {
        self.ensure_idle("edit the job description")?;
        self.job_description = job_description;
        Ok(())
    }

    /// Appends to the staged list. Returns the new staged count.
    pub fn stage(&mut self, files: Vec<CandidateFile>) -> Result<usize, AppError> {
        self.ensure_idle("stage files")?;
        self.staged.extend(files);
        Ok(self.staged.len())
    }

    pub fn remove_staged(&mut self, index: usize) -> Result<CandidateFile, AppError> {
        self.ensure_idle("remove files")?;
        if index >= self.staged.len() {
            return Err(AppError::NotFound(format!("No staged file at index {index}")));
        }
        Ok(self.staged.remove(index))
    }

    /// Replaces the job description and staged files with the demo batch.
    pub fn load_demo(&mut self) -> Result<(), AppError> {
        self.ensure_idle("load demo data")?;
        let (job_description, files) = intake::demo_batch();
        self.job_description = job_description;
        self.staged = files;
        Ok(())
    }

    // ── Running ─────────────────────────────────────────────────────────────

    /// Spawns the batch run in the background and returns its size.
    pub fn start_run(&mut self, runner: &BatchRunner) -> Result<usize, AppError> {
        let snapshot = self.snapshots.borrow().clone();
        if snapshot.is_running() {
            return Err(AppError::Conflict("A batch run is already in progress".to_string()));
        }
        if snapshot.state != RunState::Idle {
            return Err(AppError::Conflict(
                "Results from a previous run exist; reset the session first".to_string(),
            ));
        }
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "job_description cannot be empty".to_string(),
            ));
        }
        if self.staged.is_empty() {
            return Err(AppError::Validation("No files staged for screening".to_string()));
        }

        let files = self.staged.clone();
        let total = files.len();
        let (tx, rx) = watch::channel(BatchSnapshot {
            state: RunState::Running,
            progress: BatchProgress { current: 0, total },
            results: Vec::new(),
        });
        let cancel = CancelFlag::default();
        let job_description = self.job_description.clone();

        self.snapshots = rx;
        self.cancel = cancel.clone();
        self.run_job_description = Some(job_description.clone());
        self.selection.clear();
        self.comparison = None;

        let runner = runner.clone();
        let session_id = self.id;
        tokio::spawn(
            async move {
                let finished = runner.run(files, &job_description, &tx, &cancel).await;
                info!("Run ended: {:?}", finished.state);
            }
            .instrument(info_span!("batch_run", session_id = %session_id)),
        );

        info!("Session {} started batch run of {total} candidates", self.id);
        Ok(total)
    }

    pub fn cancel(&self) -> Result<(), AppError> {
        if !self.is_running() {
            return Err(AppError::Conflict("No batch run is in progress".to_string()));
        }
        self.cancel.cancel();
        info!("Session {} cancellation requested", self.id);
        Ok(())
    }

    /// Starts a new batch: drops results, staged files, selection and comparison.
    /// The job description is kept.
    pub fn reset(&mut self) -> Result<(), AppError> {
        self.ensure_idle("reset the session")?;
        let (_, snapshots) = watch::channel(BatchSnapshot::default());
        self.snapshots = snapshots;
        self.cancel = CancelFlag::default();
        self.staged.clear();
        self.run_job_description = None;
        self.selection.clear();
        self.comparison = None;
        Ok(())
    }

    pub fn candidate(&self, candidate_id: Uuid) -> Result<BatchCandidateResult, AppError> {
        self.snapshots
            .borrow()
            .find(candidate_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
    }

    // ── Duel ────────────────────────────────────────────────────────────────

    /// Toggles a completed candidate in or out of the duel selection.
    pub fn toggle_selection(&mut self, candidate_id: Uuid) -> Result<bool, AppError> {
        let candidate = self.candidate(candidate_id)?;
        if candidate.status() != CandidateStatus::Completed {
            return Err(AppError::Validation(format!(
                "Candidate {candidate_id} has not completed analysis"
            )));
        }
        Ok(self.selection.toggle(candidate_id))
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn comparison_request(&self) -> Result<ComparisonRequest, AppError> {
        let job_description = self
            .run_job_description
            .as_deref()
            .unwrap_or(&self.job_description);
        let snapshot = self.snapshots.borrow();
        duel::build_request(&self.selection, &snapshot.results, job_description)
            .map_err(AppError::from)
    }

    /// Stores the result only if the pair it was built from is still selected.
    /// Candidate ids are unique per run, so this also rejects results that
    /// outlived a reset or a new run.
    pub fn record_comparison(
        &mut self,
        request: &ComparisonRequest,
        comparison: ComparisonResult,
    ) -> Result<(), AppError> {
        if self.selection.pair() != Some((request.id_a, request.id_b)) {
            warn!(
                "Session {}: dropping comparison of {} vs {}, selection changed",
                self.id, request.name_a, request.name_b
            );
            return Err(AppError::Conflict(
                "The selection changed while the comparison was running".to_string(),
            ));
        }
        self.comparison = Some(comparison);
        Ok(())
    }

    pub fn clear_comparison(&mut self) {
        self.comparison = None;
        self.selection.clear();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

pub type SharedSession = Arc<Mutex<ScreeningSession>>;

/// In-memory session registry. Sessions live until the process exits.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, job_description: Option<String>) -> SharedSession {
        let session = ScreeningSession::new(job_description);
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, shared.clone());
        info!("Created screening session {id}");
        shared
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Screening session {id} not found")))
    }
}
