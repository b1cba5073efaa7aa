//! HTTP surface for the crawler
//!
//! This module exposes the crawl service over HTTP:
//! - `POST /crawl` runs one batch crawl and returns its report
//! - `GET /health` for liveness checks
//! - Per-client rate limiting on `/crawl`
//! - Graceful shutdown that cancels in-flight crawls

pub mod dto;
mod errors;
mod handlers;
mod rate_limit;

pub use errors::ApiError;
pub use rate_limit::ClientRateLimiter;

use crate::config::Config;
use crate::crawler::CrawlService;
use crate::CrawlerError;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn CrawlService>,

    /// Parent of every per-request cancellation token
    pub shutdown: CancellationToken,

    pub limiter: ClientRateLimiter,
}

impl AppState {
    pub fn new(
        service: Arc<dyn CrawlService>,
        shutdown: CancellationToken,
        rate_limit_rpm: u32,
    ) -> Self {
        Self {
            service,
            shutdown,
            limiter: ClientRateLimiter::new(rate_limit_rpm),
        }
    }
}

/// Builds the application router
///
/// Only `/crawl` is rate limited; health checks always go through.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/crawl", post(handlers::crawl))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_by_client,
        ))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C
pub async fn serve(config: &Config, service: Arc<dyn CrawlService>) -> Result<(), CrawlerError> {
    let listener = TcpListener::bind(config.server.bind_address()).await?;
    let shutdown = CancellationToken::new();

    tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

    serve_on(listener, service, shutdown, config.server.rate_limit_rpm).await
}

/// Serves on an already-bound listener until `shutdown` fires
///
/// Cancelling `shutdown` stops accepting connections and cancels every
/// in-flight crawl; their partial reports are still sent.
pub async fn serve_on(
    listener: TcpListener,
    service: Arc<dyn CrawlService>,
    shutdown: CancellationToken,
    rate_limit_rpm: u32,
) -> Result<(), CrawlerError> {
    tracing::info!(
        address = %listener.local_addr()?,
        rate_limit_rpm,
        "HTTP server listening"
    );

    let app = router(AppState::new(service, shutdown.clone(), rate_limit_rpm));
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Cancels `token` on the first Ctrl-C
///
/// If the signal handler cannot be installed the token is left alone.
pub async fn cancel_on_ctrl_c(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("Received Ctrl-C, shutting down");
            token.cancel();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    }
}
