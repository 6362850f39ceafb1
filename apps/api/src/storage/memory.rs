//! In-process stores used by tests in place of the file and Redis backends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{KeyValueStore, StorageError, StoreKind};

pub struct MemoryStore {
    kind: StoreKind,
    entries: Mutex<HashMap<String, String>>,
    writes_rejected: AtomicBool,
}

impl MemoryStore {
    pub fn new(kind: StoreKind) -> Self {
        Self {
            kind,
            entries: Mutex::new(HashMap::new()),
            writes_rejected: AtomicBool::new(false),
        }
    }

    /// From now on `set_raw` errors; reads and removes keep working.
    pub fn reject_writes(&self) {
        self.writes_rejected.store(true, Ordering::SeqCst);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().await.contains_key(key)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn kind(&self) -> StoreKind {
        self.kind
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.writes_rejected.load(Ordering::SeqCst) {
            return Err(broken_pipe());
        }
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// A store whose every operation errors, as when the connection or disk drops.
pub struct FailingStore(pub StoreKind);

#[async_trait]
impl KeyValueStore for FailingStore {
    fn kind(&self) -> StoreKind {
        self.0
    }

    async fn get_raw(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(broken_pipe())
    }

    async fn set_raw(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(broken_pipe())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(broken_pipe())
    }
}

fn broken_pipe() -> StorageError {
    StorageError::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "connection dropped",
    ))
}
