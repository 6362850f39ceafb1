mod applications;
mod capture;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod popup;
mod resume;
mod routes;
mod state;
mod storage;
mod tailoring;

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::popup::PopupOrchestrator;
use crate::resume::MasterResumeStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{probe_local, probe_sync};
use crate::tailoring::scoring::{AtsScorer, KeywordAtsScorer, LlmAtsScorer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (companion backend)
    let db = create_pool(&config.database_url).await?;

    // Probe both key-value backends; either may come back unavailable
    let local = probe_local(Path::new(&config.local_store_path)).await;
    let sync = probe_sync(config.sync_store_url.as_deref()).await;
    info!(
        "Storage: local={}, synchronized={}",
        local.is_available(),
        sync.is_available()
    );
    let resumes = MasterResumeStore::new(local, sync.clone());

    // Initialize LLM client
    let generator: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.anthropic_api_url.clone(),
    )?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize ATS scorer (swap via ENABLE_LLM_SCORING)
    let scorer: Arc<dyn AtsScorer> = if config.enable_llm_scoring {
        Arc::new(LlmAtsScorer(generator.clone()))
    } else {
        Arc::new(KeywordAtsScorer)
    };
    info!(
        "ATS scorer: {}",
        if config.enable_llm_scoring { "llm" } else { "keyword" }
    );

    let popup = PopupOrchestrator::new(resumes.clone(), sync.clone(), generator, scorer);
    let popup_view = popup.subscribe();

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        resumes,
        sync,
        popup: Arc::new(Mutex::new(popup)),
        popup_view,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the extension id once it is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
