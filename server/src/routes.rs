//! HTTP routes.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `POST /` | [`start_quiz`] |
//! | `GET /health` | [`health`] |
//! | `GET /runs/{run_id}` | [`get_run`] |

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
};
use quiz_domain::{QuizRequest, QuizRunReport};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub run_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(start_quiz))
        .route("/health", get(health))
        .route("/runs/{run_id}", get(get_run))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Accept a quiz task and solve it in the background.
///
/// `POST /`
///
/// The body is read as raw bytes so that malformed JSON maps to
/// `{"detail": "Invalid JSON"}` rather than axum's extractor rejection.
pub async fn start_quiz(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StartResponse>, AppError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|_| AppError::InvalidJson)?;
    let request = QuizRequest::from_json(&payload)?;

    let run_id = Uuid::new_v4().to_string();
    info!(run_id = %run_id, email = %request.email, url = %request.url, "Quiz task accepted");
    state.spawn_run(run_id.clone(), request).await;

    Ok(Json(StartResponse {
        message: "Quiz processing started",
        status: "ok",
        run_id,
    }))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "active" })
}

/// Latest report of a run.
///
/// `GET /runs/{run_id}`
pub async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Result<Json<QuizRunReport>, AppError> {
    state
        .registry()
        .get(&run_id)
        .await
        .map(Json)
        .ok_or(AppError::RunNotFound)
}
