//! Key-value storage adapter.
//!
//! Two physical backends sit behind [`KeyValueStore`]: the file-backed [`LocalStore`]
//! owned by the web application, and the Redis-backed [`SyncStore`] shared across
//! contexts. Both are probed once at startup; a failed probe produces an
//! unavailable [`StorageAdapter`] whose calls degrade to no-ops instead of raising.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub mod local;
#[cfg(test)]
pub mod memory;
pub mod sync;

pub use local::LocalStore;
pub use sync::SyncStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Local,
    Sync,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Local => write!(f, "local"),
            StoreKind::Sync => write!(f, "synchronized"),
        }
    }
}

/// Well-known record keys shared by every context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    MasterResume,
    CurrentPageHtml,
    CurrentPageText,
    CurrentPageUrl,
    BasicJobData,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::MasterResume => "masterResume",
            StorageKey::CurrentPageHtml => "currentPageHTML",
            StorageKey::CurrentPageText => "currentPageText",
            StorageKey::CurrentPageUrl => "currentPageURL",
            StorageKey::BasicJobData => "basicJobData",
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} store is unavailable")]
    Unavailable(StoreKind),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// A physical string-keyed store holding JSON-encoded strings.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_raw(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Writes several records. Backends that can do so write them as one unit.
    async fn set_many_raw(&self, entries: Vec<(String, String)>) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set_raw(&key, value).await?;
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Capability-checked handle on one physical backend.
///
/// The lenient methods (`set`, `get`, `remove`) never fail: an absent backend or a
/// backend error is logged and reported as `false` / `None`. The `try_*` methods
/// surface the error for call sites that must notify the user.
#[derive(Clone)]
pub struct StorageAdapter {
    kind: StoreKind,
    backend: Option<Arc<dyn KeyValueStore>>,
}

impl StorageAdapter {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kind: backend.kind(),
            backend: Some(backend),
        }
    }

    pub fn unavailable(kind: StoreKind) -> Self {
        Self {
            kind,
            backend: None,
        }
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    fn backend(&self) -> Result<&Arc<dyn KeyValueStore>, StorageError> {
        self.backend
            .as_ref()
            .ok_or(StorageError::Unavailable(self.kind))
    }

    pub async fn try_set<T: Serialize + ?Sized + Sync>(
        &self,
        key: StorageKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let backend = self.backend()?;
        let encoded = serde_json::to_string(value)?;
        backend.set_raw(key.as_str(), encoded).await
    }

    pub async fn try_get<T: DeserializeOwned>(
        &self,
        key: StorageKey,
    ) -> Result<Option<T>, StorageError> {
        let backend = self.backend()?;
        match backend.get_raw(key.as_str()).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes every value first, then hands the batch to the backend in one call.
    pub async fn try_set_many(
        &self,
        entries: &[(StorageKey, serde_json::Value)],
    ) -> Result<(), StorageError> {
        let backend = self.backend()?;
        let encoded = entries
            .iter()
            .map(|(key, value)| -> Result<(String, String), serde_json::Error> {
                Ok((key.as_str().to_string(), serde_json::to_string(value)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        backend.set_many_raw(encoded).await
    }

    pub async fn set<T: Serialize + ?Sized + Sync>(&self, key: StorageKey, value: &T) -> bool {
        match self.try_set(key, value).await {
            Ok(()) => true,
            Err(e) => {
                warn!("{} store: set {} failed: {e}", self.kind, key.as_str());
                false
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("{} store: get {} failed: {e}", self.kind, key.as_str());
                None
            }
        }
    }

    pub async fn remove(&self, key: StorageKey) -> bool {
        let result = match self.backend() {
            Ok(backend) => backend.remove(key.as_str()).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("{} store: remove {} failed: {e}", self.kind, key.as_str());
                false
            }
        }
    }
}

/// Opens the local file store. An unreadable store file yields an unavailable adapter.
pub async fn probe_local(path: &Path) -> StorageAdapter {
    match LocalStore::open(path).await {
        Ok(store) => {
            info!("Local store opened at {}", path.display());
            StorageAdapter::new(Arc::new(store))
        }
        Err(e) => {
            warn!("Local store unavailable ({}): {e}", path.display());
            StorageAdapter::unavailable(StoreKind::Local)
        }
    }
}

/// Connects to the synchronized store. No URL or a failed PING yields an unavailable adapter.
pub async fn probe_sync(url: Option<&str>) -> StorageAdapter {
    let Some(url) = url else {
        warn!("SYNC_STORE_URL not set; synchronized store disabled");
        return StorageAdapter::unavailable(StoreKind::Sync);
    };

    match SyncStore::connect(url).await {
        Ok(store) => {
            info!("Synchronized store connected");
            StorageAdapter::new(Arc::new(store))
        }
        Err(e) => {
            warn!("Synchronized store unavailable: {e}");
            StorageAdapter::unavailable(StoreKind::Sync)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{FailingStore, MemoryStore};
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get_decodes_value() {
        let adapter = StorageAdapter::new(Arc::new(MemoryStore::new(StoreKind::Local)));
        assert!(adapter.set(StorageKey::CurrentPageUrl, "https://jobs.example.com/1").await);

        let url: Option<String> = adapter.get(StorageKey::CurrentPageUrl).await;
        assert_eq!(url.as_deref(), Some("https://jobs.example.com/1"));
    }

    #[tokio::test]
    async fn test_values_are_stored_as_json_strings() {
        let store = Arc::new(MemoryStore::new(StoreKind::Sync));
        let adapter = StorageAdapter::new(store.clone());
        adapter.set(StorageKey::CurrentPageText, "Hello").await;

        let raw = store.get_raw("currentPageText").await.unwrap();
        assert_eq!(raw.as_deref(), Some("\"Hello\""));
    }

    #[tokio::test]
    async fn test_unavailable_adapter_degrades_to_noop() {
        let adapter = StorageAdapter::unavailable(StoreKind::Sync);
        assert!(!adapter.is_available());
        assert!(!adapter.set(StorageKey::MasterResume, &json!({"summary": "x"})).await);
        assert!(adapter.get::<serde_json::Value>(StorageKey::MasterResume).await.is_none());
        assert!(!adapter.remove(StorageKey::MasterResume).await);
    }

    #[tokio::test]
    async fn test_unavailable_adapter_try_set_many_reports_kind() {
        let adapter = StorageAdapter::unavailable(StoreKind::Sync);
        let err = adapter
            .try_set_many(&[(StorageKey::CurrentPageUrl, json!("https://a"))])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(StoreKind::Sync)));
    }

    #[tokio::test]
    async fn test_failing_backend_is_swallowed_by_lenient_calls() {
        let adapter = StorageAdapter::new(Arc::new(FailingStore(StoreKind::Sync)));
        assert!(!adapter.set(StorageKey::BasicJobData, &json!({})).await);
        assert!(adapter.get::<serde_json::Value>(StorageKey::BasicJobData).await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_value_reads_as_absent() {
        let store = Arc::new(MemoryStore::new(StoreKind::Local));
        store.set_raw("masterResume", "{not json".to_string()).await.unwrap();
        let adapter = StorageAdapter::new(store);

        let value: Option<serde_json::Value> = adapter.get(StorageKey::MasterResume).await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_remove_deletes_record() {
        let adapter = StorageAdapter::new(Arc::new(MemoryStore::new(StoreKind::Local)));
        adapter.set(StorageKey::CurrentPageHtml, "<html></html>").await;
        assert!(adapter.remove(StorageKey::CurrentPageHtml).await);
        assert!(adapter.get::<String>(StorageKey::CurrentPageHtml).await.is_none());
    }

    #[tokio::test]
    async fn test_probe_sync_without_url_is_unavailable() {
        let adapter = probe_sync(None).await;
        assert!(!adapter.is_available());
        assert_eq!(adapter.kind(), StoreKind::Sync);
    }

    #[test]
    fn test_storage_keys_are_stable() {
        assert_eq!(StorageKey::MasterResume.as_str(), "masterResume");
        assert_eq!(StorageKey::CurrentPageHtml.as_str(), "currentPageHTML");
        assert_eq!(StorageKey::BasicJobData.as_str(), "basicJobData");
    }
}
