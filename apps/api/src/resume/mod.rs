//! Master Resume Accessor.
//!
//! Policy: the local store is authoritative, the synchronized store is a best-effort
//! replica. Reads prefer the replica because it is the only store every context can
//! see, and repair it from the local copy when it is missing.

use tracing::{debug, info, warn};

use crate::models::resume::ResumeDocument;
use crate::storage::{StorageAdapter, StorageError, StorageKey, StoreKind};

pub mod handlers;

#[derive(Clone)]
pub struct MasterResumeStore {
    local: StorageAdapter,
    sync: StorageAdapter,
}

impl MasterResumeStore {
    pub fn new(local: StorageAdapter, sync: StorageAdapter) -> Self {
        Self { local, sync }
    }

    /// Synchronized store first; on miss or error, the local store, replicating any
    /// local hit back into the synchronized store.
    pub async fn load(&self) -> Option<ResumeDocument> {
        if let Some(resume) = self.sync.get(StorageKey::MasterResume).await {
            debug!("Master resume read from synchronized store");
            return Some(resume);
        }

        let resume: ResumeDocument = self.local.get(StorageKey::MasterResume).await?;
        debug!("Master resume read from local store");

        if self.sync.is_available() && self.sync.set(StorageKey::MasterResume, &resume).await {
            info!("Replicated master resume into synchronized store");
        }
        Some(resume)
    }

    /// Writes the local store, then mirrors to the synchronized store.
    ///
    /// Success is decided by the local write. Without a local store the synchronized
    /// write takes its place. A failed mirror evicts the replica so the next load
    /// reads the local copy instead of an older one.
    pub async fn save(&self, resume: &ResumeDocument) -> Result<(), StorageError> {
        if !self.local.is_available() {
            warn!("Local store unavailable; writing master resume to synchronized store only");
            return self.sync.try_set(StorageKey::MasterResume, resume).await;
        }

        self.local.try_set(StorageKey::MasterResume, resume).await?;

        if self.sync.is_available() && !self.sync.set(StorageKey::MasterResume, resume).await {
            warn!("Master resume saved locally but not mirrored; evicting synchronized copy");
            if !self.sync.remove(StorageKey::MasterResume).await {
                warn!("Synchronized copy of the master resume may be stale");
            }
        }
        Ok(())
    }

    /// Removes the record everywhere it may live.
    pub async fn clear(&self) -> Result<(), StorageError> {
        if !self.local.is_available() && !self.sync.is_available() {
            return Err(StorageError::Unavailable(StoreKind::Local));
        }
        self.local.remove(StorageKey::MasterResume).await;
        self.sync.remove(StorageKey::MasterResume).await;
        Ok(())
    }
}
