//! Axum route handlers for the companion backend.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::applications::repository;
use crate::errors::AppError;
use crate::models::application::{ApplicationRow, ApplicationStatus, NewApplication};
use crate::models::resume::ResumeDocument;
use crate::models::user::{UserResumeRow, UserRow};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl UpdateApplicationRequest {
    fn parsed_status(&self) -> Result<Option<ApplicationStatus>, AppError> {
        self.status
            .as_deref()
            .map(str::parse::<ApplicationStatus>)
            .transpose()
            .map_err(AppError::Validation)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("email must be a valid address".to_string()));
    }

    let user = repository::create_user(&state.db, email, request.name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:id/resume
pub async fn handle_get_user_resume(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResumeRow>, AppError> {
    repository::get_user_resume(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No resume stored for user {user_id}")))
}

/// PUT /api/v1/users/:id/resume
///
/// The body must be a resume document; it is stored as JSON.
pub async fn handle_put_user_resume(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(resume): Json<ResumeDocument>,
) -> Result<Json<UserResumeRow>, AppError> {
    let data = serde_json::to_value(&resume).map_err(anyhow::Error::from)?;
    let row = repository::upsert_user_resume(&state.db, user_id, &data).await?;
    Ok(Json(row))
}

/// GET /api/v1/users/:id/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    Ok(Json(repository::list_applications(&state.db, user_id).await?))
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(request): Json<NewApplication>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    validate_new_application(&request)?;
    let row = repository::create_application(&state.db, &request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let status = request.parsed_status()?;
    if status.is_none() && request.notes.is_none() {
        return Err(AppError::Validation(
            "status or notes must be provided".to_string(),
        ));
    }

    let row =
        repository::update_application(&state.db, id, status, request.notes.as_deref()).await?;
    Ok(Json(row))
}

fn validate_new_application(application: &NewApplication) -> Result<(), AppError> {
    if application.job_title.trim().is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }
    if application.company.trim().is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }
    if let Some(score) = application.ats_score {
        if !(0..=100).contains(&score) {
            return Err(AppError::Validation(
                "ats_score must be between 0 and 100".to_string(),
            ));
        }
    }
    Ok(())
}
