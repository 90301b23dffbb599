// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade, so these write to whichever recorder is
//! active for the calling scope.

use hookbox_core::WebhookOutcome;
use metrics::{describe_counter, describe_histogram};

/// Counter of completed HTTP requests, labelled by `path` and `status`.
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Counter of webhook outcomes, labelled by `result`.
pub const WEBHOOK_REQUESTS_TOTAL: &str = "webhook_requests_total";

/// Histogram of end-to-end request latency in milliseconds.
pub const REQUEST_LATENCY_MS: &str = "request_latency_ms";

/// Upper bounds of the latency histogram buckets, in milliseconds.
pub const LATENCY_BUCKETS_MS: &[f64] = &[
    10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0,
];

/// Register all Hookbox metric descriptions.
pub fn register_metrics() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "Total HTTP requests by path and status");
    describe_counter!(WEBHOOK_REQUESTS_TOTAL, "Webhook requests by outcome");
    describe_histogram!(REQUEST_LATENCY_MS, "Request latency in milliseconds");
}

/// Record one completed HTTP request.
pub fn record_http_request(path: &str, status: u16) {
    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record the terminal outcome of one webhook request.
pub fn record_webhook_outcome(outcome: WebhookOutcome) {
    metrics::counter!(WEBHOOK_REQUESTS_TOTAL, "result" => outcome.to_string()).increment(1);
}

/// Record request latency.
pub fn record_latency(millis: f64) {
    metrics::histogram!(REQUEST_LATENCY_MS).record(millis);
}
