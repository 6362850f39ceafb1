use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::{watch, Mutex};

use crate::config::Config;
use crate::popup::{PopupOrchestrator, PopupView};
use crate::resume::MasterResumeStore;
use crate::storage::StorageAdapter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Master resume accessor over the local and synchronized stores.
    pub resumes: MasterResumeStore,
    /// Synchronized store, written by page capture. May be unavailable.
    pub sync: StorageAdapter,
    /// Single-user popup session; one action at a time.
    pub popup: Arc<Mutex<PopupOrchestrator>>,
    /// Last view the session published. Readable while an action holds `popup`.
    pub popup_view: watch::Receiver<PopupView>,
}
