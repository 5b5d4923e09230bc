use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::github::SignatureValidator;
use crate::store::ActionStore;

pub mod error;
pub mod handlers;

/// GitHub caps webhook payloads at 25 MB.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ActionStore>,
    pub validator: Arc<SignatureValidator>,
    pub dedupe_deliveries: bool,
    /// Serializes the redelivery check with the append that follows it.
    pub dedupe_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ActionStore>,
        validator: SignatureValidator,
        dedupe_deliveries: bool,
    ) -> Self {
        Self {
            store,
            validator: Arc::new(validator),
            dedupe_deliveries,
            dedupe_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::receive_webhook))
        .route("/actions", get(handlers::list_actions))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `host` and `port` as a pair so bare IPv6 hosts such as `::` resolve.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    Ok(TcpListener::bind((host, port)).await?)
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    tracing::info!(address = %listener.local_addr()?, "Listening for webhooks");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
