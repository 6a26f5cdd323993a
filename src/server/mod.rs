//! Server Module
//!
//! HTTP front end over the storage service.
//!
//! ## Architecture
//! - axum router on a tokio runtime
//! - Engine calls are blocking and run on the blocking thread pool
//! - Every request opens and closes its storage

mod error;
mod handlers;

pub use error::{status_for, ApiError};

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::Result;
use crate::service::StorageService;

/// Build the HTTP router
pub fn router(service: Arc<StorageService>) -> Router {
    Router::new()
        .route("/create", post(handlers::create_storage))
        .route("/put", put(handlers::put_value).post(handlers::put_value))
        .route("/get", get(handlers::get_value))
        .with_state(service)
}

/// Bind the configured address and serve until Ctrl+C
pub async fn serve(config: Config) -> Result<()> {
    let listener = TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let app = router(Arc::new(StorageService::new(config)));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    tracing::info!("Received Ctrl+C, initiating shutdown...");
}
