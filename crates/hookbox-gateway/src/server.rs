// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use hookbox_core::{HookboxError, ObservabilityAdapter, StorageAdapter};
use hookbox_ingest::{IngestionPipeline, QueryService};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::observe::observe_request;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Write side: verify, validate, persist.
    pub pipeline: Arc<IngestionPipeline>,
    /// Read side: listing and stats.
    pub queries: Arc<QueryService>,
    /// Store, consulted directly by the readiness probe.
    pub storage: Arc<dyn StorageAdapter>,
    /// Metrics registry rendered by `/metrics`.
    pub metrics: Arc<dyn ObservabilityAdapter>,
}

impl GatewayState {
    /// Wire the services around one store and one registry.
    pub fn new(
        secret: Option<String>,
        storage: Arc<dyn StorageAdapter>,
        metrics: Arc<dyn ObservabilityAdapter>,
    ) -> Self {
        Self {
            pipeline: Arc::new(IngestionPipeline::new(
                secret,
                Arc::clone(&storage),
                Arc::clone(&metrics),
            )),
            queries: Arc::new(QueryService::new(Arc::clone(&storage))),
            storage,
            metrics,
        }
    }
}

/// Gateway listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the application router.
///
/// Routes:
/// - POST /webhook
/// - GET /messages
/// - GET /stats
/// - GET /metrics
/// - GET /health/live
/// - GET /health/ready
pub fn build_router(state: GatewayState) -> Router {
    let metrics = Arc::clone(&state.metrics);
    Router::new()
        .route(
            "/webhook",
            post(handlers::post_webhook)
                .layer(DefaultBodyLimit::max(handlers::MAX_WEBHOOK_BODY_BYTES)),
        )
        .route("/messages", get(handlers::get_messages))
        .route("/stats", get(handlers::get_stats))
        .route("/metrics", get(handlers::get_metrics))
        .route("/health/live", get(handlers::health_live))
        .route("/health/ready", get(handlers::health_ready))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(metrics, observe_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve until `shutdown` is cancelled, then drain in-flight requests.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), HookboxError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HookboxError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| HookboxError::Internal(format!("server error: {e}")))?;

    Ok(())
}
