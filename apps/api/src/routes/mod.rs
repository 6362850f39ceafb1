pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::capture::handlers as capture;
use crate::popup::handlers as popup;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Master resume (web app context)
        .route(
            "/api/v1/resume",
            get(resume::handle_get_resume)
                .put(resume::handle_put_resume)
                .delete(resume::handle_delete_resume),
        )
        // Page capture (content script context)
        .route(
            "/api/v1/capture",
            post(capture::handle_capture)
                .layer(DefaultBodyLimit::max(capture::MAX_CAPTURE_BODY_BYTES)),
        )
        // Popup session
        .route("/api/v1/popup", get(popup::handle_popup_view))
        .route("/api/v1/popup/init", post(popup::handle_popup_init))
        .route("/api/v1/popup/tailor", post(popup::handle_popup_tailor))
        .route("/api/v1/popup/download", get(popup::handle_popup_download))
        .route("/api/v1/popup/save", post(popup::handle_popup_save))
        // Companion backend
        .route("/api/v1/users", post(applications::handle_create_user))
        .route(
            "/api/v1/users/:id/resume",
            get(applications::handle_get_user_resume).put(applications::handle_put_user_resume),
        )
        .route(
            "/api/v1/users/:id/applications",
            get(applications::handle_list_applications),
        )
        .route(
            "/api/v1/applications",
            post(applications::handle_create_application),
        )
        .route(
            "/api/v1/applications/:id",
            patch(applications::handle_update_application),
        )
        .with_state(state)
}
