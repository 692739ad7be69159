//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::analysis::{analyze_single, AnalyzeRequest, AnalyzeResponse};
use crate::screening::batch::{BatchCandidateResult, BatchProgress, RunState};
use crate::screening::duel::run_duel;
use crate::screening::intake::{stage_uploads, UploadedFile};
use crate::screening::models::ComparisonResult;
use crate::screening::ranking::Leaderboard;
use crate::screening::selection::SelectionSet;
use crate::screening::session::SessionView;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct StageFilesResponse {
    pub added: Vec<String>,
    pub staged_count: usize,
}

#[derive(Debug, Serialize)]
pub struct RunStartedResponse {
    pub session_id: Uuid,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub state: RunState,
    pub progress: BatchProgress,
    #[serde(flatten)]
    pub leaderboard: Leaderboard,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub candidate_id: Uuid,
    pub selected: bool,
    pub selection: SelectionSet,
}

// ────────────────────────────────────────────────────────────────────────────
// Single analysis
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let response = analyze_single(state.oracle.as_ref(), &state.permits, request).await?;
    Ok(Json(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Sessions and staging
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let session = state.sessions.create(request.job_description).await;
    let view = session.lock().await.view();
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/screenings/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    let view = session.lock().await.view();
    Ok(Json(view))
}

/// PUT /api/v1/screenings/:id/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.set_job_description(request.job_description)?;
    Ok(Json(session.view()))
}

/// POST /api/v1/screenings/:id/files
///
/// Multipart upload. Every file part is considered; a lone `.zip` part is
/// expanded. Accepted files are appended to the staged list.
pub async fn handle_upload_files(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<StageFilesResponse>, AppError> {
    let session = state.sessions.get(id).await?;

    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
        uploads.push(UploadedFile {
            name,
            content_type,
            bytes,
        });
    }

    let received = uploads.len();
    let staged = stage_uploads(uploads, state.config.max_extracted_bytes)?;
    let added: Vec<String> = staged.iter().map(|f| f.name.clone()).collect();
    let staged_count = session.lock().await.stage(staged)?;

    info!(
        "Session {id}: staged {} of {received} uploaded files ({staged_count} total)",
        added.len()
    );
    Ok(Json(StageFilesResponse {
        added,
        staged_count,
    }))
}

/// POST /api/v1/screenings/:id/demo
pub async fn handle_load_demo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.load_demo()?;
    Ok(Json(session.view()))
}

/// DELETE /api/v1/screenings/:id/files/:index
pub async fn handle_remove_file(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let removed = session.remove_staged(index)?;
    info!("Session {id}: removed staged file {}", removed.name);
    Ok(Json(session.view()))
}

// ────────────────────────────────────────────────────────────────────────────
// Batch run
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings/:id/run
///
/// Returns 202 immediately; poll the session or leaderboard for progress.
pub async fn handle_start_run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RunStartedResponse>), AppError> {
    let session = state.sessions.get(id).await?;
    let total = session.lock().await.start_run(&state.runner)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(RunStartedResponse {
            session_id: id,
            total,
        }),
    ))
}

/// POST /api/v1/screenings/:id/cancel
pub async fn handle_cancel_run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let session = state.sessions.get(id).await?;
    let session = session.lock().await;
    session.cancel()?;
    Ok((StatusCode::ACCEPTED, Json(session.view())))
}

/// POST /api/v1/screenings/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.reset()?;
    Ok(Json(session.view()))
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/screenings/:id/leaderboard
pub async fn handle_leaderboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(Json(LeaderboardResponse {
        state: snapshot.state,
        progress: snapshot.progress,
        leaderboard: Leaderboard::from_results(&snapshot.results),
    }))
}

/// GET /api/v1/screenings/:id/candidates/:candidate_id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path((id, candidate_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BatchCandidateResult>, AppError> {
    let session = state.sessions.get(id).await?;
    let candidate = session.lock().await.candidate(candidate_id)?;
    Ok(Json(candidate))
}

// ────────────────────────────────────────────────────────────────────────────
// Duel
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings/:id/selection/:candidate_id
pub async fn handle_toggle_selection(
    State(state): State<AppState>,
    Path((id, candidate_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SelectionResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    let selected = session.toggle_selection(candidate_id)?;
    Ok(Json(SelectionResponse {
        candidate_id,
        selected,
        selection: session.selection().clone(),
    }))
}

/// POST /api/v1/screenings/:id/compare
///
/// The session lock is released while the oracle runs. If the selection
/// changed in the meantime the result is discarded with 409.
pub async fn handle_compare(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComparisonResult>, AppError> {
    let session = state.sessions.get(id).await?;
    let request = session.lock().await.comparison_request()?;

    let result = run_duel(state.oracle.as_ref(), &state.permits, &request).await?;

    session
        .lock()
        .await
        .record_comparison(&request, result.clone())?;
    Ok(Json(result))
}

/// DELETE /api/v1/screenings/:id/comparison
pub async fn handle_clear_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.clear_comparison();
    Ok(Json(session.view()))
}
