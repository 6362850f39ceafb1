//! Axum route handlers for page capture.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::capture::capture_page;
use crate::errors::AppError;
use crate::models::job::BasicJobData;
use crate::state::AppState;

/// Request body cap for captures. Full job-board documents routinely exceed axum's 2 MB default.
pub const MAX_CAPTURE_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub url: String,
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct CaptureResponse {
    pub url: String,
    /// Length of the visible text, in characters.
    pub text_length: usize,
    pub basic_job: BasicJobData,
}

/// POST /api/v1/capture
///
/// Snapshots the posted page into the synchronized store. Responds 503 when that
/// store is unavailable.
pub async fn handle_capture(
    State(state): State<AppState>,
    Json(request): Json<CaptureRequest>,
) -> Result<Json<CaptureResponse>, AppError> {
    if request.html.trim().is_empty() {
        return Err(AppError::Validation("html cannot be empty".to_string()));
    }

    let snapshot = capture_page(&state.sync, &request.url, request.html).await?;

    Ok(Json(CaptureResponse {
        url: snapshot.url,
        text_length: snapshot.text.chars().count(),
        basic_job: snapshot.basic_job,
    }))
}
