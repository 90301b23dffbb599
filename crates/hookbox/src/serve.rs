// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hookbox serve` command implementation.
//!
//! Wires the store, the metrics registry and the HTTP gateway together, then
//! serves until SIGINT or SIGTERM.

use std::sync::Arc;

use hookbox_config::HookboxConfig;
use hookbox_config::model::LogFormat;
use hookbox_core::{HookboxError, ObservabilityAdapter, PluginAdapter, StorageAdapter};
use hookbox_gateway::{GatewayState, ServerConfig, start_server};
use hookbox_prometheus::PrometheusAdapter;
use hookbox_storage::SqliteStorage;
use tracing::{error, info, warn};

use crate::shutdown;

/// Runs the service until a shutdown signal arrives.
pub async fn run_serve(config: HookboxConfig) -> Result<(), HookboxError> {
    init_tracing(&config.log.level, config.log.format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "starting hookbox"
    );
    if config.webhook.secret.is_none() {
        warn!("webhook secret is not configured; all webhooks will be rejected and readiness reports not ready");
    }

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = config.storage.resolved_path(), "storage initialized");

    let metrics = Arc::new(PrometheusAdapter::new()?);

    let state = GatewayState::new(
        config.webhook.secret.clone(),
        Arc::clone(&storage) as Arc<dyn StorageAdapter>,
        Arc::clone(&metrics) as Arc<dyn ObservabilityAdapter>,
    );
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let cancel = shutdown::install_signal_handler();
    let served = start_server(&server_config, state, cancel).await;

    if let Err(e) = storage.shutdown().await {
        error!(error = %e, "failed to close storage cleanly");
    }
    info!("hookbox stopped");

    served
}

/// Directive understood by `EnvFilter` for a configured level name.
fn filter_level(level: &str) -> String {
    match level.to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        other => other.to_string(),
    }
}

/// Initializes the tracing subscriber with the given log level and format.
fn init_tracing(log_level: &str, format: LogFormat) {
    use tracing_subscriber::EnvFilter;

    let level = filter_level(log_level);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hookbox={level},tower_http={level},warn")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().with_current_span(false).init(),
    }
}
