//! Upload-and-view web endpoint

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::batch::BatchProcessor;
use crate::config::ViewerConfig;
use crate::reports::HtmlReport;

pub use error::ApiError;

const UPLOAD_LIMIT_BYTES: usize = 64 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<BatchProcessor>,
    pub upload_page: Arc<String>,
}

impl AppState {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            processor: Arc::new(BatchProcessor::new(
                config.mapping.mapper(),
                config.batch.clone(),
            )),
            upload_page: Arc::new(HtmlReport::new(&config.report).upload_page()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/upload", post(handlers::upload))
        .route("/api/health", get(handlers::health))
        .route("/api/info", get(handlers::info))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped
pub async fn serve(config: &ViewerConfig) -> Result<()> {
    let app = build_router(AppState::from_config(config));
    let addr = config.server.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
