//! Page capture: snapshots a hosted job page and publishes it to the synchronized store.
//!
//! The snapshot (markup, visible text, URL, heuristic job record) is written as one
//! batch. Capture has no fallback: without the synchronized store it fails and the
//! caller is told so.

use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::models::job::BasicJobData;
use crate::storage::{StorageAdapter, StorageError, StorageKey};

pub mod extractor;
pub mod handlers;

use extractor::{body_text, extract_basic_job};

/// A point-in-time snapshot of a hosted page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
    pub text: String,
    pub basic_job: BasicJobData,
}

impl PageSnapshot {
    /// Parses the markup once for both visible text and heuristic extraction.
    pub fn from_markup(url: &str, html: String) -> Self {
        let document = Html::parse_document(&html);
        let text = body_text(&document).unwrap_or_default();
        let basic_job = extract_basic_job(&document, url);
        Self {
            url: url.to_string(),
            html,
            text,
            basic_job,
        }
    }
}

/// The last capture as read back by the popup.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPage {
    pub url: Option<String>,
    pub html: String,
    pub text: Option<String>,
    pub basic_job: Option<BasicJobData>,
}

/// Snapshots the page and writes it to the synchronized store in one batch.
pub async fn capture_page(
    sync: &StorageAdapter,
    url: &str,
    html: String,
) -> Result<PageSnapshot, StorageError> {
    let snapshot = PageSnapshot::from_markup(url, html);

    let batch = [
        (StorageKey::CurrentPageHtml, json!(snapshot.html)),
        (StorageKey::CurrentPageText, json!(snapshot.text)),
        (StorageKey::CurrentPageUrl, json!(snapshot.url)),
        (
            StorageKey::BasicJobData,
            serde_json::to_value(&snapshot.basic_job)?,
        ),
    ];

    if let Err(e) = sync.try_set_many(&batch).await {
        error!("Page capture failed for {url}: {e}");
        return Err(e);
    }

    info!(
        "Captured {} ({} chars of text, title={:?})",
        snapshot.url,
        snapshot.text.chars().count(),
        snapshot.basic_job.title
    );
    Ok(snapshot)
}

/// Reads the last capture. `None` when nothing was captured or the store is unavailable.
pub async fn load_captured_page(sync: &StorageAdapter) -> Option<CapturedPage> {
    let html: String = sync.get(StorageKey::CurrentPageHtml).await?;
    Some(CapturedPage {
        html,
        url: sync.get(StorageKey::CurrentPageUrl).await,
        text: sync.get(StorageKey::CurrentPageText).await,
        basic_job: sync.get(StorageKey::BasicJobData).await,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::memory::MemoryStore;
    use crate::storage::StoreKind;

    const JOB_PAGE: &str = r#"<html><body>
        <h1 class="job-title">Senior React Developer</h1>
        <div class="company-name">Tech Corp</div>
        <div id="job-description">Join Tech Corp to build the next generation of our React
        platform. You will work with TypeScript, GraphQL and a great design team.</div>
    </body></html>"#;

    #[tokio::test]
    async fn test_capture_writes_full_snapshot() {
        let sync = StorageAdapter::new(Arc::new(MemoryStore::new(StoreKind::Sync)));
        let snapshot = capture_page(&sync, "https://jobs.example.com/9", JOB_PAGE.to_string())
            .await
            .unwrap();
        assert_eq!(snapshot.basic_job.title, "Senior React Developer");

        let page = load_captured_page(&sync).await.unwrap();
        assert_eq!(page.html, JOB_PAGE);
        assert_eq!(page.url.as_deref(), Some("https://jobs.example.com/9"));
        assert!(page.text.unwrap().contains("GraphQL"));
        let basic = page.basic_job.unwrap();
        assert_eq!(basic.title, "Senior React Developer");
        assert_eq!(basic.company, "Tech Corp");
    }

    #[tokio::test]
    async fn test_capture_fails_without_sync_store() {
        let sync = StorageAdapter::unavailable(StoreKind::Sync);
        let result = capture_page(&sync, "https://jobs.example.com/9", JOB_PAGE.to_string()).await;
        assert!(matches!(result, Err(StorageError::Unavailable(StoreKind::Sync))));
    }

    #[tokio::test]
    async fn test_recapture_overwrites_previous_page() {
        let sync = StorageAdapter::new(Arc::new(MemoryStore::new(StoreKind::Sync)));
        capture_page(&sync, "https://a.example", JOB_PAGE.to_string())
            .await
            .unwrap();
        capture_page(&sync, "https://b.example", "<h1>Other</h1>".to_string())
            .await
            .unwrap();

        let page = load_captured_page(&sync).await.unwrap();
        assert_eq!(page.url.as_deref(), Some("https://b.example"));
        assert_eq!(page.basic_job.unwrap().title, "Other");
    }

    #[tokio::test]
    async fn test_nothing_captured_reads_as_none() {
        let sync = StorageAdapter::new(Arc::new(MemoryStore::new(StoreKind::Sync)));
        assert!(load_captured_page(&sync).await.is_none());
    }
}
