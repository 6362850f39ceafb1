//! Axum route handlers for the master resume.

use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

/// GET /api/v1/resume
pub async fn handle_get_resume(
    State(state): State<AppState>,
) -> Result<Json<ResumeDocument>, AppError> {
    state
        .resumes
        .load()
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No master resume has been saved".to_string()))
}

/// PUT /api/v1/resume
pub async fn handle_put_resume(
    State(state): State<AppState>,
    Json(resume): Json<ResumeDocument>,
) -> Result<Json<ResumeDocument>, AppError> {
    state.resumes.save(&resume).await?;
    Ok(Json(resume))
}

/// DELETE /api/v1/resume
pub async fn handle_delete_resume(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.resumes.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}
