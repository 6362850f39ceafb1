//! Axum route handlers for the popup session.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::applications::repository::create_application;
use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::popup::PopupView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveApplicationRequest {
    pub user_id: Uuid,
    pub notes: Option<String>,
}

/// GET /api/v1/popup
///
/// Served from the last published view, so it answers while an action is running.
pub async fn handle_popup_view(State(state): State<AppState>) -> Json<PopupView> {
    let view = state.popup_view.borrow().clone();
    Json(view)
}

/// POST /api/v1/popup/init
///
/// Loads the master resume and the last captured page, then parses the job.
/// Always succeeds; missing pieces are reported in `messages`.
pub async fn handle_popup_init(State(state): State<AppState>) -> Json<PopupView> {
    Json(state.popup.lock().await.init().await)
}

/// POST /api/v1/popup/tailor
///
/// 409 when no resume or no job is loaded.
pub async fn handle_popup_tailor(
    State(state): State<AppState>,
) -> Result<Json<PopupView>, AppError> {
    let view = state.popup.lock().await.tailor().await?;
    Ok(Json(view))
}

/// GET /api/v1/popup/download
///
/// The tailored resume (or the original, before tailoring) as a markdown attachment.
pub async fn handle_popup_download(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let download = state.popup.lock().await.download()?;
    let disposition = format!("attachment; filename=\"{}\"", download.filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.content,
    ))
}

/// POST /api/v1/popup/save
///
/// Persists the current job (and tailored resume, if any) as an application record.
pub async fn handle_popup_save(
    State(state): State<AppState>,
    Json(request): Json<SaveApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let mut draft = state.popup.lock().await.application_draft(request.user_id)?;
    if let Some(notes) = request.notes.filter(|n| !n.trim().is_empty()) {
        draft.notes = Some(notes);
    }

    let row = create_application(&state.db, &draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}
