// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles POST /webhook, GET /messages, GET /stats, GET /metrics and the
//! health probes.

use axum::{
    Json,
    body::Bytes,
    extract::{
        Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use hookbox_core::{HealthStatus, HookboxError, InsertOutcome, Stats};
use hookbox_ingest::pipeline::outcome_of;
use hookbox_ingest::{ListParams, MessagesResponse};
use serde::Serialize;

use crate::error::{ApiError, ErrorResponse};
use crate::observe::WebhookLog;
use crate::server::GatewayState;

/// Header carrying the hex HMAC-SHA256 of the request body.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Largest webhook body read before the request is rejected as invalid.
pub const MAX_WEBHOOK_BODY_BYTES: usize = 64 * 1024;

/// Content type of the Prometheus text exposition format.
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// `{"status": "ok"}`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const OK: Self = Self { status: "ok" };
}

/// POST /webhook
///
/// Created and duplicate messages both answer 200; the difference shows only
/// in metrics and logs. A body that cannot be read (over
/// [`MAX_WEBHOOK_BODY_BYTES`]) is a 422 `validation_error`.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    let result = match body {
        Ok(body) => state.pipeline.ingest(&body, signature).await,
        Err(rejection) => Err(state.pipeline.reject_unreadable(&rejection.body_text())),
    };

    let log = WebhookLog {
        message_id: result.as_ref().ok().map(|i| i.message_id.clone()),
        dup: result
            .as_ref()
            .ok()
            .map(|i| i.outcome == InsertOutcome::Duplicate),
        result: outcome_of(&result),
    };

    let mut response = match result {
        Ok(_) => Json(StatusResponse::OK).into_response(),
        Err(err) => ApiError(err).into_response(),
    };
    response.extensions_mut().insert(log);
    response
}

/// GET /messages
pub async fn get_messages(
    State(state): State<GatewayState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let Query(params) = params.map_err(|e| HookboxError::Validation(e.body_text()))?;
    Ok(Json(state.queries.list(&params).await?))
}

/// GET /stats
pub async fn get_stats(State(state): State<GatewayState>) -> Result<Json<Stats>, ApiError> {
    Ok(Json(state.queries.stats().await?))
}

/// GET /metrics
pub async fn get_metrics(State(state): State<GatewayState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}

/// GET /health/live
pub async fn health_live() -> Json<StatusResponse> {
    Json(StatusResponse::OK)
}

/// GET /health/ready
///
/// Ready only with a webhook secret configured and a healthy store.
pub async fn health_ready(State(state): State<GatewayState>) -> Response {
    if !state.pipeline.has_secret() {
        return not_ready("webhook secret not configured");
    }
    match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => Json(StatusResponse::OK).into_response(),
        Ok(HealthStatus::Unhealthy(reason)) => {
            tracing::warn!(%reason, "storage not ready");
            not_ready("storage not ready")
        }
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            not_ready("storage not ready")
        }
    }
}

fn not_ready(detail: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
        .into_response()
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: "Not Found".to_string(),
        }),
    )
        .into_response()
}
