//! End-to-end tests for the `/api/booking` routes against a mocked partner.

mod common;

use axum::http::StatusCode;
use common::{body_json, spawn_app, PARTNER_API_KEY};
use httpmock::prelude::*;
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: paginated partner replies are split into data and total
// ---------------------------------------------------------------------------

#[tokio::test]
async fn locations_are_split_into_data_and_total() {
    let app = spawn_app().await;
    let mock = app
        .partner
        .mock_async(|when, then| {
            when.method(GET)
                .path("/locations")
                .header("x-api-key", PARTNER_API_KEY);
            then.status(200).json_body(json!({
                "data": [{"id": "loc-1"}, {"id": "loc-2"}],
                "total": 2
            }));
        })
        .await;

    let response = app.get("/api/booking/get-locations", &[]).await;

    mock.assert_async().await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "status": true,
            "message": "Locations fetched successfully",
            "data": [{"id": "loc-1"}, {"id": "loc-2"}],
            "total": 2,
            "fromCache": false
        })
    );
}

// ---------------------------------------------------------------------------
// Test: location header is required for products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn products_require_location_header() {
    let app = spawn_app().await;

    let response = app.get("/api/booking/get-products", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "status": false,
            "message": "Vendor location uuid is required",
            "fromCache": false
        })
    );
}

#[tokio::test]
async fn products_forward_location_header() {
    let app = spawn_app().await;
    let mock = app
        .partner
        .mock_async(|when, then| {
            when.method(GET)
                .path("/products")
                .header("vendor_location_uuid", "loc-3");
            then.status(200).json_body(json!([{"sku": "argan-oil"}]));
        })
        .await;

    let response = app
        .get("/api/booking/get-products", &[("vendor_location_uuid", "loc-3")])
        .await;

    mock.assert_async().await;
    assert_eq!(body_json(response).await["data"], json!([{"sku": "argan-oil"}]));
}

#[tokio::test]
async fn services_use_business_id_from_path() {
    let app = spawn_app().await;
    let mock = app
        .partner
        .mock_async(|when, then| {
            when.method(GET).path("/businesses/biz-1/services");
            then.status(200).json_body(json!([{"id": "svc-1", "name": "Cut"}]));
        })
        .await;

    let response = app.get("/api/booking/get-services/biz-1", &[]).await;

    mock.assert_async().await;
    assert_eq!(body_json(response).await["data"][0]["name"], "Cut");
}

#[tokio::test]
async fn undecodable_business_id_is_an_envelope() {
    let app = spawn_app().await;

    let response = app.get("/api/booking/get-services/%FF", &[]).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "status": false,
            "message": "Business id is not valid",
            "fromCache": false
        })
    );
}

#[tokio::test]
async fn blank_business_id_is_required() {
    let app = spawn_app().await;
    let mock = app
        .partner
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(json!([]));
        })
        .await;

    let response = app
        .post_json(
            "/api/booking/get-slots/%20%20",
            &[],
            &json!({
                "start_date": "2026-10-16",
                "end_date": "2026-10-16",
                "service_ids": ["svc-1"]
            }),
        )
        .await;

    let json = body_json(response).await;
    assert_eq!(json["status"], false);
    assert_eq!(json["message"], "Business id is required");
    mock.assert_hits_async(0).await;
}

// ---------------------------------------------------------------------------
// Test: slots are grouped by period when asked
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slots_are_grouped_by_period() {
    let app = spawn_app().await;
    let mock = app
        .partner
        .mock_async(|when, then| {
            when.method(POST)
                .path("/businesses/biz-1/slots")
                .json_body(json!({
                    "start_date": "2026-10-16",
                    "end_date": "2026-10-17",
                    "service_ids": ["svc-1"]
                }));
            then.status(200).json_body(json!({
                "slots": [
                    {"id": "a", "start_time": "2026-10-16T09:30:00+00:00"},
                    {"id": "b", "start_time": "2:00 PM"},
                    "6:15 PM"
                ]
            }));
        })
        .await;

    let response = app
        .post_json(
            "/api/booking/get-slots/biz-1",
            &[],
            &json!({
                "start_date": "2026-10-16",
                "end_date": "2026-10-17",
                "service_ids": ["svc-1"],
                "group_by_period": "true"
            }),
        )
        .await;

    mock.assert_async().await;
    let json = body_json(response).await;
    assert_eq!(json["status"], true);
    assert_eq!(json["data"]["morning"][0]["id"], "a");
    assert_eq!(json["data"]["morning"][0]["label"], "9:30 AM");
    assert_eq!(json["data"]["afternoon"][0]["period"], "afternoon");
    assert_eq!(
        json["data"]["evening"][0],
        json!({"start_time": "6:15 PM", "label": "6:15 PM", "period": "evening"})
    );
}

#[tokio::test]
async fn slots_without_grouping_are_returned_as_is() {
    let app = spawn_app().await;
    app.partner
        .mock_async(|when, then| {
            when.method(POST).path("/businesses/biz-1/slots");
            then.status(200).json_body(json!(["9:00 AM", "9:30 AM"]));
        })
        .await;

    let response = app
        .post_json(
            "/api/booking/get-slots/biz-1",
            &[],
            &json!({
                "start_date": "2026-10-16",
                "end_date": "2026-10-16",
                "service_ids": ["svc-1"],
                "staff_id": "st-1"
            }),
        )
        .await;

    assert_eq!(body_json(response).await["data"], json!(["9:00 AM", "9:30 AM"]));
}

#[tokio::test]
async fn slots_reject_inverted_date_range() {
    let app = spawn_app().await;

    let response = app
        .post_json(
            "/api/booking/get-slots/biz-1",
            &[],
            &json!({
                "start_date": "2026-10-17",
                "end_date": "2026-10-16",
                "service_ids": ["svc-1"]
            }),
        )
        .await;

    let json = body_json(response).await;
    assert_eq!(json["status"], false);
    assert_eq!(json["message"], "\"end_date\" must be on or after \"start_date\"");
}

#[tokio::test]
async fn slots_report_every_invalid_field() {
    let app = spawn_app().await;

    let response = app
        .post_json(
            "/api/booking/get-slots/biz-1",
            &[],
            &json!({"start_date": "16/10/2026", "service_ids": []}),
        )
        .await;

    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "\"start_date\" must be a valid date in YYYY-MM-DD format, \"end_date\" is required, \"service_ids\" must contain at least 1 items"
    );
}

// ---------------------------------------------------------------------------
// Test: create-booking takes the location from the body when no header is sent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_booking_falls_back_to_body_location() {
    let app = spawn_app().await;
    let mock = app
        .partner
        .mock_async(|when, then| {
            when.method(POST)
                .path("/bookings")
                .header("authorization", "Bearer tok-1")
                .header("vendor_location_uuid", "loc-body")
                .json_body(json!({
                    "service_ids": ["svc-1"],
                    "start_time": "2026-10-16T10:00:00+00:00"
                }));
            then.status(201).json_body(json!({"id": "bk-1", "message": "Booked"}));
        })
        .await;

    let response = app
        .post_json(
            "/api/booking/create-booking",
            &[("authorization", "Bearer tok-1")],
            &json!({
                "vendor_location_uuid": "loc-body",
                "service_ids": ["svc-1"],
                "start_time": "2026-10-16T10:00:00+00:00"
            }),
        )
        .await;

    mock.assert_async().await;
    let json = body_json(response).await;
    assert_eq!(json["status"], true);
    assert_eq!(json["data"]["id"], "bk-1");
}

#[tokio::test]
async fn create_booking_without_location_fails() {
    let app = spawn_app().await;

    let response = app
        .post_json(
            "/api/booking/create-booking",
            &[("authorization", "Bearer tok-1")],
            &json!({
                "service_ids": ["svc-1"],
                "start_time": "2026-10-16T10:00:00+00:00"
            }),
        )
        .await;

    assert_eq!(
        body_json(response).await["message"],
        "Vendor location uuid is required"
    );
}

// ---------------------------------------------------------------------------
// Test: cancel-booking behaves identically on POST and PATCH
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancel_booking_accepts_post_and_patch() {
    let app = spawn_app().await;
    let mock = app
        .partner
        .mock_async(|when, then| {
            when.method(POST)
                .path("/bookings/bk-7/cancel")
                .header("authorization", "Bearer tok-2")
                .json_body(json!({"reason": "Sick"}));
            then.status(200).json_body(json!({"cancelled": true}));
        })
        .await;

    let body = json!({"booking_id": "bk-7", "reason": "Sick"});
    let mut envelopes = Vec::new();
    for method in ["POST", "PATCH"] {
        let response = app
            .send_json(
                method,
                "/api/booking/cancel-booking",
                &[("authorization", "Bearer tok-2")],
                &body,
            )
            .await;
        envelopes.push(body_json(response).await);
    }

    mock.assert_hits_async(2).await;
    assert_eq!(envelopes[0], envelopes[1]);
    assert_eq!(envelopes[0]["message"], "Booking cancelled successfully");
}

#[tokio::test]
async fn partner_rejection_message_is_shown() {
    let app = spawn_app().await;
    app.partner
        .mock_async(|when, then| {
            when.method(GET).path("/bookings");
            then.status(403)
                .json_body(json!({"error": {"message": "Token revoked"}}));
        })
        .await;

    let response = app
        .get("/api/booking/get-user-bookings", &[("authorization", "Bearer tok-3")])
        .await;

    let json = body_json(response).await;
    assert_eq!(json["status"], false);
    assert_eq!(json["message"], "Token revoked");
}

// ---------------------------------------------------------------------------
// Test: calendar links are computed locally
// ---------------------------------------------------------------------------

#[tokio::test]
async fn calendar_links_are_generated() {
    let app = spawn_app().await;

    let response = app
        .post_json(
            "/api/booking/calendar-links",
            &[],
            &json!({
                "title": "Haircut",
                "start": "2026-10-16T10:00:00+02:00",
                "end": "2026-10-16T11:00:00+02:00",
                "location": "Main Street"
            }),
        )
        .await;

    let json = body_json(response).await;
    assert_eq!(json["status"], true);
    let google = json["data"]["google"].as_str().unwrap();
    assert!(google.contains("dates=20261016T080000Z%2F20261016T090000Z"));
    assert!(json["data"]["ics"].as_str().unwrap().contains("SUMMARY:Haircut"));
    assert!(json["data"]["outlook"].as_str().unwrap().starts_with("https://outlook.live.com/"));
}

#[tokio::test]
async fn calendar_links_reject_end_before_start() {
    let app = spawn_app().await;

    let response = app
        .post_json(
            "/api/booking/calendar-links",
            &[],
            &json!({
                "title": "Haircut",
                "start": "2026-10-16T11:00:00Z",
                "end": "2026-10-16T10:00:00Z"
            }),
        )
        .await;

    let json = body_json(response).await;
    assert_eq!(json["status"], false);
    assert_eq!(json["message"], "Event end must be after its start");
}
