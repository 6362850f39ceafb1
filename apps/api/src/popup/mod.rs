// Popup session: load resume and captured page, parse the job, then tailor,
// score and export on demand.

pub mod handlers;
pub mod orchestrator;
pub mod render;

use thiserror::Error;

pub use orchestrator::{PopupOrchestrator, PopupView};

#[derive(Debug, Error)]
pub enum PopupError {
    /// A user action ran before the data it needs was loaded.
    #[error("Not ready: {0}")]
    NotReady(String),
}
