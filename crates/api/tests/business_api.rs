//! Tests for the `/api/business` routes, health check and shared middleware.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, spawn_app};
use httpmock::prelude::*;
use salon_api::background::open_status::OpeningSnapshot;
use salon_core::hours::OpeningState;
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: business hours carry a fresh open/closed evaluation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hours_marked_closed_evaluate_closed() {
    let app = spawn_app().await;
    let hours = json!({
        "today_hour": "not open",
        "today_opening_status": "Closed",
        "sunday": "not open",
        "monday": "9:00 AM - 7:00 PM"
    });
    let mock = app
        .backend
        .mock_async(|when, then| {
            when.method(GET).path("/business/hours");
            then.status(200)
                .json_body(json!({"status": true, "message": "Hours", "data": hours}));
        })
        .await;

    let response = app.get("/api/business/hours", &[]).await;

    mock.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], true);
    assert_eq!(json["message"], "Hours");
    assert_eq!(json["data"]["hours"], hours);
    assert_eq!(json["data"]["today_opening_status_now"], "Closed");
    assert_eq!(json["data"]["is_open"], false);
    assert!(json["data"]["checked_at"].is_string());
}

#[tokio::test]
async fn all_day_hours_evaluate_open() {
    let app = spawn_app().await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/business/hours");
            then.status(200).json_body(json!({
                "status": true,
                "data": {
                    "today_hour": "12:00 AM - 11:59 PM",
                    "today_opening_status": "Open"
                }
            }));
        })
        .await;

    let json = body_json(app.get("/api/business/hours", &[]).await).await;

    assert_eq!(json["message"], "Business hours fetched successfully");
    assert_eq!(json["data"]["today_opening_status_now"], "Open");
}

#[tokio::test]
async fn hours_backend_failure_is_an_envelope() {
    let app = spawn_app().await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/business/hours");
            then.status(503).json_body(json!({"message": "Maintenance"}));
        })
        .await;

    let json = body_json(app.get("/api/business/hours", &[]).await).await;

    assert_eq!(json["status"], false);
    assert_eq!(json["message"], "Maintenance");
}

// ---------------------------------------------------------------------------
// Test: open-status reads the monitor snapshot without calling the backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn open_status_reports_latest_snapshot() {
    let app = spawn_app().await;
    let mock = app
        .backend
        .mock_async(|when, then| {
            when.path("/business/hours");
            then.status(200).json_body(json!({"status": true}));
        })
        .await;

    let before = body_json(app.get("/api/business/open-status", &[]).await).await;
    assert_eq!(before["data"]["state"], "Closed");
    assert_eq!(before["data"]["checked_at"], serde_json::Value::Null);

    app.open_status.send_replace(OpeningSnapshot {
        state: OpeningState::Open,
        is_open: true,
        today_hour: Some("9:00 AM - 7:00 PM".to_string()),
        checked_at: None,
    });
    let after = body_json(app.get("/api/business/open-status", &[]).await).await;

    assert_eq!(after["status"], true);
    assert_eq!(after["data"]["state"], "Open");
    assert_eq!(after["data"]["today_hour"], "9:00 AM - 7:00 PM");
    mock.assert_hits_async(0).await;
}

// ---------------------------------------------------------------------------
// Test: health check and middleware
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_request_id() {
    let app = spawn_app().await;

    let response = app.get("/health", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = spawn_app().await;

    let response = app.get("/api/does-not-exist", &[]).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_on_known_route_is_an_envelope() {
    let app = spawn_app().await;

    let response = app.get("/api/auth/login", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "status": false,
            "message": "GET is not supported on /api/auth/login",
            "fromCache": false
        })
    );
}

#[tokio::test]
async fn cors_preflight_allows_location_header() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/booking/get-products")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "vendor_location_uuid")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response
        .headers()
        .get("access-control-allow-headers")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    assert!(allowed.contains("vendor_location_uuid"));
}
