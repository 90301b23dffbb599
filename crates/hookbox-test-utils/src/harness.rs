// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete service with a temp SQLite database
//! and drives it through `tower::ServiceExt::oneshot`, so no socket is bound.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use hookbox_config::model::{HookboxConfig, StorageConfig, WebhookConfig};
use hookbox_core::{HookboxError, ObservabilityAdapter, StorageAdapter};
use hookbox_gateway::{GatewayState, build_router};
use hookbox_ingest::compute_signature;
use hookbox_prometheus::PrometheusAdapter;
use hookbox_storage::SqliteStorage;
use tower::ServiceExt;

/// Secret the harness configures unless told otherwise.
pub const TEST_SECRET: &str = "testsecret";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    secret: Option<String>,
    wal_mode: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            secret: Some(TEST_SECRET.to_string()),
            wal_mode: true,
        }
    }

    /// Use a different webhook secret.
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = Some(secret.to_string());
        self
    }

    /// Run without a webhook secret (the service stays not-ready).
    pub fn without_secret(mut self) -> Self {
        self.secret = None;
        self
    }

    /// Toggle WAL journaling on the temp database.
    pub fn with_wal_mode(mut self, enabled: bool) -> Self {
        self.wal_mode = enabled;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, HookboxError> {
        let temp_dir = tempfile::TempDir::new().map_err(HookboxError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let config = HookboxConfig {
            webhook: WebhookConfig {
                secret: self.secret.clone(),
            },
            storage: StorageConfig {
                database_path: db_path.to_string_lossy().into_owned(),
                wal_mode: self.wal_mode,
            },
            ..HookboxConfig::default()
        };

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;
        let metrics = Arc::new(PrometheusAdapter::new()?);

        let state = GatewayState::new(
            self.secret,
            Arc::clone(&storage) as Arc<dyn StorageAdapter>,
            Arc::clone(&metrics) as Arc<dyn ObservabilityAdapter>,
        );
        let router = build_router(state.clone());

        Ok(TestHarness {
            storage,
            metrics,
            state,
            router,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete in-process service over a temp database.
pub struct TestHarness {
    /// SQLite store (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    /// Private metrics registry.
    pub metrics: Arc<PrometheusAdapter>,
    /// The state handed to the router.
    pub state: GatewayState,
    /// The full application router.
    pub router: Router,
    /// Configuration matching the assembled services.
    pub config: HookboxConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A `POST /webhook` request signed with `secret`.
    pub fn signed_request(secret: &str, body: &str) -> Request<Body> {
        let signature = compute_signature(secret.as_bytes(), body.as_bytes());
        Request::post("/webhook")
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-Signature", signature)
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|e| panic!("invalid webhook request: {e}"))
    }

    /// Send `request` through the router and return status and body text.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| match e {});
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("failed to read response body: {e}"));
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send `request` and parse the body as JSON.
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.send(request).await;
        let json = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("response is not JSON ({e}): {body}"));
        (status, json)
    }

    /// Post `body` signed with the harness secret.
    pub async fn post_webhook(&self, body: &str) -> (StatusCode, serde_json::Value) {
        self.send_json(Self::signed_request(TEST_SECRET, body)).await
    }

    /// `GET uri`, parsed as JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::get(uri)
            .body(Body::empty())
            .unwrap_or_else(|e| panic!("invalid uri {uri}: {e}"));
        self.send_json(request).await
    }

    /// Current metrics exposition text.
    pub fn metrics_text(&self) -> String {
        self.metrics.render()
    }

    /// Value of one exact series in the exposition text, 0 when absent.
    pub fn metric_value(&self, series: &str) -> f64 {
        self.metrics_text()
            .lines()
            .find(|l| l.starts_with(series) && l[series.len()..].starts_with(' '))
            .and_then(|l| l.rsplit(' ').next())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0)
    }
}

/// A webhook JSON body with the given identity, sender and timestamp.
pub fn message_body(message_id: &str, from: &str, ts: &str, text: Option<&str>) -> String {
    serde_json::json!({
        "message_id": message_id,
        "from": from,
        "to": "+14155550100",
        "ts": ts,
        "text": text,
    })
    .to_string()
}
