// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-request metrics and structured access logging.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use hookbox_core::{MetricEvent, ObservabilityAdapter, WebhookOutcome};
use tracing::Level;

/// Header carrying the generated request id back to the caller.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Webhook details a handler attaches to its response for the access log.
#[derive(Debug, Clone)]
pub struct WebhookLog {
    pub message_id: Option<String>,
    pub dup: Option<bool>,
    pub result: WebhookOutcome,
}

/// Records exactly one `http_requests_total` increment and one latency
/// observation per request, then logs it.
///
/// Paths are labelled by route template when one matched, else by the raw
/// request path.
pub async fn observe_request(
    State(metrics): State<Arc<dyn ObservabilityAdapter>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let mut response = next.run(request).await;

    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let status = response.status().as_u16();
    metrics.record(MetricEvent::HttpRequest {
        path: path.clone(),
        status,
    });
    metrics.record(MetricEvent::Latency { millis: latency_ms });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let webhook = response.extensions().get::<WebhookLog>();
    let message_id = webhook.and_then(|w| w.message_id.as_deref());
    let dup = webhook.and_then(|w| w.dup);
    let result = webhook.map(|w| w.result.to_string());
    let result = result.as_deref();
    let latency_ms = (latency_ms * 100.0).round() / 100.0;
    let status = u64::from(status);

    macro_rules! request_event {
        ($level:expr) => {
            tracing::event!(
                $level,
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                latency_ms,
                message_id,
                dup,
                result,
                "request"
            )
        };
    }

    if path.starts_with("/health") {
        request_event!(Level::DEBUG);
    } else if status < 400 {
        request_event!(Level::INFO);
    } else {
        request_event!(Level::ERROR);
    }

    response
}
