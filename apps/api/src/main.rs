mod analysis;
mod config;
mod db;
mod errors;
mod extract;
mod jobs;
mod models;
mod ranking;
mod resumes;
mod routes;
mod scoring;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod testing;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::PdfTextExtractor;
use crate::config::{Config, StorageConfig};
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStorage, LocalStorage, S3Storage};
use crate::store::PgStore;

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

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Initialize file storage
    let files: Arc<dyn FileStorage> = match &config.storage {
        StorageConfig::Local {
            upload_dir,
            public_base_url,
        } => {
            tokio::fs::create_dir_all(upload_dir).await?;
            info!("Storing uploads under {}", upload_dir.display());
            Arc::new(LocalStorage::new(upload_dir.clone(), public_base_url))
        }
        StorageConfig::S3(settings) => Arc::new(S3Storage::connect(settings).await),
    };

    // Build app state
    let state = AppState::new(store, files, Arc::new(PdfTextExtractor), config.clone());
    info!(
        "Experience policy: {}, upload limit: {} bytes",
        state.analyzer.policy(),
        config.max_upload_bytes
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
