// SPDX-FileCopyrightText: 2026 Hookbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use hookbox_config::model::StorageConfig;
use hookbox_core::StorageAdapter;
use hookbox_gateway::{GatewayState, build_router};
use hookbox_ingest::compute_signature;
use hookbox_prometheus::PrometheusAdapter;
use hookbox_storage::SqliteStorage;
use tower::ServiceExt;
use tracing_test::traced_test;

const SECRET: &str = "testsecret";

struct TestApp {
    router: Router,
    storage: Arc<SqliteStorage>,
    _dir: tempfile::TempDir,
}

async fn app_with_secret(secret: Option<&str>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(SqliteStorage::new(StorageConfig {
        database_path: dir.path().join("gw.db").to_string_lossy().into_owned(),
        wal_mode: true,
    }));
    storage.initialize().await.unwrap();
    let metrics = Arc::new(PrometheusAdapter::new().unwrap());
    let state = GatewayState::new(secret.map(str::to_string), storage.clone(), metrics);
    TestApp {
        router: build_router(state),
        storage,
        _dir: dir,
    }
}

async fn app() -> TestApp {
    app_with_secret(Some(SECRET)).await
}

fn webhook_body(id: &str, from: &str, ts: &str) -> String {
    format!(r#"{{"message_id":"{id}","from":"{from}","to":"+14155550100","ts":"{ts}","text":"Hello"}}"#)
}

fn signed_webhook(body: &str) -> Request<Body> {
    let sig = compute_signature(SECRET.as_bytes(), body.as_bytes());
    Request::post("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Signature", sig)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = send(router, request).await;
    (status, serde_json::from_str(&body).unwrap())
}

fn metric(rendered: &str, series: &str) -> u64 {
    rendered
        .lines()
        .find(|l| l.starts_with(series) && l[series.len()..].starts_with(' '))
        .and_then(|l| l.rsplit(' ').next())
        .and_then(|v| v.parse::<f64>().ok())
        .map(|v| v as u64)
        .unwrap_or(0)
}

#[tokio::test]
async fn webhook_created_and_duplicate_both_ok() {
    let app = app().await;
    let body = webhook_body("m1", "+919876543210", "2025-01-15T10:00:00Z");

    let (status, json) = send_json(&app.router, signed_webhook(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"status": "ok"}));

    let (status, json) = send_json(&app.router, signed_webhook(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"status": "ok"}));

    assert_eq!(app.storage.stats().await.unwrap().total_messages, 1);
}

#[tokio::test]
async fn webhook_with_bad_signature_is_401() {
    let app = app().await;
    let body = webhook_body("m1", "+1", "2025-01-15T10:00:00Z");
    let request = Request::post("/webhook")
        .header("X-Signature", "123")
        .body(Body::from(body))
        .unwrap();
    let (status, json) = send_json(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["detail"], "invalid signature");
}

#[tokio::test]
async fn webhook_without_signature_is_401() {
    let app = app().await;
    let request = Request::post("/webhook")
        .body(Body::from(webhook_body("m1", "+1", "2025-01-15T10:00:00Z")))
        .unwrap();
    let (status, _) = send_json(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.storage.stats().await.unwrap().total_messages, 0);
}

#[tokio::test]
async fn webhook_without_configured_secret_is_401() {
    let app = app_with_secret(None).await;
    let body = webhook_body("m1", "+1", "2025-01-15T10:00:00Z");
    let (status, _) = send_json(&app.router, signed_webhook(&body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signed_invalid_payload_is_422() {
    let app = app().await;
    let body = webhook_body("m1", "not-a-number", "2025-01-15T10:00:00Z");
    let (status, json) = send_json(&app.router, signed_webhook(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("from"));
}

#[tokio::test]
async fn oversized_webhook_is_422_and_counted() {
    let app = app().await;
    let text = "x".repeat(hookbox_gateway::handlers::MAX_WEBHOOK_BODY_BYTES + 1);
    let body = format!(
        r#"{{"message_id":"big","from":"+1","to":"+2","ts":"2025-01-15T10:00:00Z","text":"{text}"}}"#
    );

    let (status, json) = send_json(&app.router, signed_webhook(&body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().starts_with("request body rejected"));

    let (_, _, text) = send(&app.router, get("/metrics")).await;
    assert_eq!(metric(&text, r#"webhook_requests_total{result="validation_error"}"#), 1);
    assert_eq!(metric(&text, r#"http_requests_total{path="/webhook",status="422"}"#), 1);
    assert_eq!(app.storage.stats().await.unwrap().total_messages, 0);
}

#[tokio::test]
async fn messages_listing_envelope_and_filters() {
    let app = app().await;
    for (id, from, ts) in [
        ("m3", "+2", "2025-01-15T10:00:02Z"),
        ("m1", "+1", "2025-01-15T10:00:00Z"),
        ("m2", "+2", "2025-01-15T10:00:01Z"),
    ] {
        send(&app.router, signed_webhook(&webhook_body(id, from, ts))).await;
    }

    let (status, json) = send_json(&app.router, get("/messages")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);
    assert_eq!(json["limit"], 50);
    assert_eq!(json["offset"], 0);
    let ids: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["m1", "m2", "m3"]);
    assert_eq!(json["data"][0]["from"], "+1");
    assert_eq!(json["data"][0]["ts"], "2025-01-15T10:00:00Z");

    let (_, json) = send_json(&app.router, get("/messages?from=%2B2&limit=1&offset=1")).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["data"][0]["message_id"], "m3");

    let (_, json) = send_json(&app.router, get("/messages?from=+2")).await;
    assert_eq!(json["total"], 2);

    let (_, json) = send_json(&app.router, get("/messages?since=2025-01-15T10:00:01Z")).await;
    assert_eq!(json["total"], 2);
}

#[tokio::test]
async fn messages_limits_are_clamped_or_rejected() {
    let app = app().await;
    let (status, json) = send_json(&app.router, get("/messages?limit=1000&offset=-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["limit"], 100);
    assert_eq!(json["offset"], 0);

    let (status, _) = send_json(&app.router, get("/messages?limit=abc")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, json) = send_json(&app.router, get("/messages?since=yesterday")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("since"));
}

#[tokio::test]
async fn stats_on_empty_and_populated_store() {
    let app = app().await;
    let (status, json) = send_json(&app.router, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({
            "total_messages": 0,
            "senders_count": 0,
            "messages_per_sender": [],
            "first_message_ts": null,
            "last_message_ts": null,
        })
    );

    for (id, from, ts) in [
        ("a", "+1", "2025-01-15T10:00:00Z"),
        ("b", "+2", "2025-01-15T11:00:00Z"),
        ("c", "+2", "2025-01-15T12:00:00Z"),
    ] {
        send(&app.router, signed_webhook(&webhook_body(id, from, ts))).await;
    }
    let (_, json) = send_json(&app.router, get("/stats")).await;
    assert_eq!(json["total_messages"], 3);
    assert_eq!(json["senders_count"], 2);
    assert_eq!(
        json["messages_per_sender"],
        serde_json::json!([{"from": "+2", "count": 2}, {"from": "+1", "count": 1}])
    );
    assert_eq!(json["first_message_ts"], "2025-01-15T10:00:00Z");
    assert_eq!(json["last_message_ts"], "2025-01-15T12:00:00Z");
}

#[tokio::test]
async fn metrics_endpoint_reports_requests_and_outcomes() {
    let app = app().await;
    let body = webhook_body("m1", "+1", "2025-01-15T10:00:00Z");
    send(&app.router, signed_webhook(&body)).await;
    send(&app.router, signed_webhook(&body)).await;
    send(
        &app.router,
        Request::post("/webhook").body(Body::from(body.clone())).unwrap(),
    )
    .await;
    send(&app.router, get("/nope")).await;

    let (status, headers, text) = send(&app.router, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain; version=0.0.4")
    );
    assert_eq!(metric(&text, r#"webhook_requests_total{result="created"}"#), 1);
    assert_eq!(metric(&text, r#"webhook_requests_total{result="duplicate"}"#), 1);
    assert_eq!(metric(&text, r#"webhook_requests_total{result="invalid_signature"}"#), 1);
    assert_eq!(metric(&text, r#"http_requests_total{path="/webhook",status="200"}"#), 2);
    assert_eq!(metric(&text, r#"http_requests_total{path="/webhook",status="401"}"#), 1);
    assert_eq!(metric(&text, r#"http_requests_total{path="/nope",status="404"}"#), 1);
    // The /metrics request itself is recorded after rendering.
    assert_eq!(metric(&text, "request_latency_ms_count"), 4);
    assert_eq!(metric(&text, r#"request_latency_ms_bucket{le="+Inf"}"#), 4);
}

#[tokio::test]
async fn liveness_is_always_ok() {
    let app = app_with_secret(None).await;
    let (status, json) = send_json(&app.router, get("/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn readiness_requires_secret_and_healthy_store() {
    let app = app().await;
    let (status, json) = send_json(&app.router, get("/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    let no_secret = app_with_secret(None).await;
    let (status, json) = send_json(&no_secret.router, get("/health/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["detail"].as_str().unwrap().contains("secret"));

    app.storage.close().await.unwrap();
    let (status, _) = send_json(&app.router, get("/health/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn storage_failure_is_503() {
    let app = app().await;
    app.storage.close().await.unwrap();
    let body = webhook_body("m1", "+1", "2025-01-15T10:00:00Z");
    let (status, json) = send_json(&app.router, signed_webhook(&body)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["detail"], "storage unavailable");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = app().await;
    let (_, headers, _) = send(&app.router, get("/health/live")).await;
    let id = headers["x-request-id"].to_str().unwrap();
    assert!(uuid_like(id), "unexpected request id {id}");
}

fn uuid_like(s: &str) -> bool {
    s.len() == 36 && s.chars().filter(|c| *c == '-').count() == 4
}

#[tokio::test]
#[traced_test]
async fn webhook_requests_are_logged_with_outcome() {
    let app = app().await;
    let body = webhook_body("logged-1", "+1", "2025-01-15T10:00:00Z");
    send(&app.router, signed_webhook(&body)).await;
    send(&app.router, signed_webhook(&body)).await;

    assert!(logs_contain("message_id=\"logged-1\""));
    assert!(logs_contain("result=\"created\""));
    assert!(logs_contain("result=\"duplicate\""));
    assert!(logs_contain("dup=true"));
}
