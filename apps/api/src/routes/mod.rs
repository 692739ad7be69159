pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Single-candidate analysis
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        // Screening sessions
        .route("/api/v1/screenings", post(handlers::handle_create_session))
        .route("/api/v1/screenings/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/screenings/:id/job-description",
            put(handlers::handle_set_job_description),
        )
        .route(
            "/api/v1/screenings/:id/files",
            post(handlers::handle_upload_files),
        )
        .route(
            "/api/v1/screenings/:id/files/:index",
            delete(handlers::handle_remove_file),
        )
        .route(
            "/api/v1/screenings/:id/demo",
            post(handlers::handle_load_demo),
        )
        // Batch runs
        .route(
            "/api/v1/screenings/:id/run",
            post(handlers::handle_start_run),
        )
        .route(
            "/api/v1/screenings/:id/cancel",
            post(handlers::handle_cancel_run),
        )
        .route("/api/v1/screenings/:id/reset", post(handlers::handle_reset))
        .route(
            "/api/v1/screenings/:id/leaderboard",
            get(handlers::handle_leaderboard),
        )
        .route(
            "/api/v1/screenings/:id/candidates/:candidate_id",
            get(handlers::handle_get_candidate),
        )
        // Duel
        .route(
            "/api/v1/screenings/:id/selection/:candidate_id",
            post(handlers::handle_toggle_selection),
        )
        .route(
            "/api/v1/screenings/:id/compare",
            post(handlers::handle_compare),
        )
        .route(
            "/api/v1/screenings/:id/comparison",
            delete(handlers::handle_clear_comparison),
        )
        .layer(body_limit)
        .with_state(state)
}
