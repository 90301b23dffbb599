// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-local metrics registry for the Hookbox webhook inbox.
//!
//! Uses the metrics-rs facade with a Prometheus recorder that is owned by the
//! adapter rather than installed globally, so each registry (and each test)
//! keeps its own counters. Metrics are rendered as Prometheus text format and
//! exposed through the gateway's `/metrics` endpoint. Nothing is persisted;
//! all values reset on restart.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

use hookbox_core::traits::adapter::PluginAdapter;
use hookbox_core::traits::observability::ObservabilityAdapter;
use hookbox_core::types::{AdapterType, HealthStatus, MetricEvent};
use hookbox_core::HookboxError;

pub use recording::{LATENCY_BUCKETS_MS, record_http_request, record_latency, record_webhook_outcome};

/// Prometheus metrics adapter.
///
/// Counters are atomics inside the recorder, so concurrent requests never
/// lose increments; [`render`](PrometheusAdapter::render) reads a snapshot.
pub struct PrometheusAdapter {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Create a registry with the fixed latency buckets.
    pub fn new() -> Result<Self, HookboxError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(recording::REQUEST_LATENCY_MS.to_string()),
                LATENCY_BUCKETS_MS,
            )
            .map_err(|e| HookboxError::Internal(format!("invalid latency buckets: {e}")))?
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, recording::register_metrics);

        tracing::debug!("prometheus metrics registry created");

        Ok(Self { recorder, handle })
    }

    /// Get a reference to the Prometheus handle for rendering.
    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, HookboxError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HookboxError> {
        Ok(())
    }
}

impl ObservabilityAdapter for PrometheusAdapter {
    fn record(&self, event: MetricEvent) {
        metrics::with_local_recorder(&self.recorder, || match event {
            MetricEvent::HttpRequest { path, status } => record_http_request(&path, status),
            MetricEvent::Webhook(outcome) => record_webhook_outcome(outcome),
            MetricEvent::Latency { millis } => record_latency(millis),
        });
    }

    fn render(&self) -> String {
        self.handle.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookbox_core::WebhookOutcome;
    use std::sync::Arc;

    fn line_value(rendered: &str, series: &str) -> Option<f64> {
        rendered
            .lines()
            .find(|line| line.starts_with(series) && line[series.len()..].starts_with(' '))
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|v| v.parse().ok())
    }

    #[test]
    fn prometheus_adapter_identity() {
        let adapter = PrometheusAdapter::new().unwrap();
        assert_eq!(adapter.name(), "prometheus");
        assert_eq!(adapter.adapter_type(), AdapterType::Observability);
    }

    #[test]
    fn counters_render_with_labels() {
        let adapter = PrometheusAdapter::new().unwrap();
        adapter.record(MetricEvent::HttpRequest {
            path: "/webhook".into(),
            status: 200,
        });
        adapter.record(MetricEvent::HttpRequest {
            path: "/webhook".into(),
            status: 200,
        });
        adapter.record(MetricEvent::Webhook(WebhookOutcome::Created));

        let out = adapter.render();
        assert_eq!(
            line_value(&out, r#"http_requests_total{path="/webhook",status="200"}"#),
            Some(2.0)
        );
        assert_eq!(
            line_value(&out, r#"webhook_requests_total{result="created"}"#),
            Some(1.0)
        );
    }

    #[test]
    fn latency_buckets_are_cumulative() {
        let adapter = PrometheusAdapter::new().unwrap();
        for millis in [5.0, 30.0, 30.0, 7000.0] {
            adapter.record(MetricEvent::Latency { millis });
        }

        let out = adapter.render();
        assert_eq!(line_value(&out, r#"request_latency_ms_bucket{le="10"}"#), Some(1.0));
        assert_eq!(line_value(&out, r#"request_latency_ms_bucket{le="25"}"#), Some(1.0));
        assert_eq!(line_value(&out, r#"request_latency_ms_bucket{le="50"}"#), Some(3.0));
        assert_eq!(line_value(&out, r#"request_latency_ms_bucket{le="5000"}"#), Some(3.0));
        assert_eq!(line_value(&out, r#"request_latency_ms_bucket{le="+Inf"}"#), Some(4.0));
        assert_eq!(line_value(&out, "request_latency_ms_count"), Some(4.0));
        assert_eq!(line_value(&out, "request_latency_ms_sum"), Some(7065.0));
    }

    #[test]
    fn registries_are_isolated() {
        let a = PrometheusAdapter::new().unwrap();
        let b = PrometheusAdapter::new().unwrap();
        a.record(MetricEvent::Webhook(WebhookOutcome::Duplicate));
        assert!(line_value(&b.render(), r#"webhook_requests_total{result="duplicate"}"#).is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        let adapter = Arc::new(PrometheusAdapter::new().unwrap());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let adapter = Arc::clone(&adapter);
            handles.push(tokio::spawn(async move {
                for _ in 0..250 {
                    adapter.record(MetricEvent::Webhook(WebhookOutcome::Created));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(
            line_value(&adapter.render(), r#"webhook_requests_total{result="created"}"#),
            Some(2000.0)
        );
    }
}
