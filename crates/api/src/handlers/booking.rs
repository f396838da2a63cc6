//! Handlers for the `/booking` resource, proxied to the booking partner.
//!
//! `calendar-links` is the only handler computed locally.

use axum::extract::State;
use chrono::DateTime;
use salon_core::calendar::CalendarEvent;
use salon_core::slots::{find_slot_list, group_slots_by_period};
use salon_core::types::Timestamp;
use salon_core::validation::{
    Constraint, FieldKind, FieldRule, RequestSchema, Schema, ValidationFailed,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::middleware::context::{BearerToken, BusinessId, LocationId, OptionalLocationId};
use crate::response::{build_success, from_reply, ApiResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /booking/get-slots/{business_id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SlotsRequest {
    pub start_date: String,
    pub end_date: String,
    pub service_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    /// Group the returned slots into morning/afternoon/evening. Not forwarded.
    #[serde(default, skip_serializing)]
    pub group_by_period: bool,
}

impl RequestSchema for SlotsRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "get-slots",
        fields: &[
            FieldRule::required("start_date", FieldKind::String).with(&[Constraint::Date]),
            FieldRule::required("end_date", FieldKind::String).with(&[Constraint::Date]),
            FieldRule::required("service_ids", FieldKind::StringList)
                .with(&[Constraint::MinItems(1)]),
            FieldRule::optional("staff_id", FieldKind::String),
            FieldRule::optional("group_by_period", FieldKind::Boolean),
        ],
    };
}

/// Request body for `POST /booking/create-booking`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// Location fallback when the header is absent. Sent as a header, never in the body.
    #[serde(default, skip_serializing)]
    pub vendor_location_uuid: Option<String>,
    pub service_ids: Vec<String>,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RequestSchema for CreateBookingRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "create-booking",
        fields: &[
            FieldRule::optional("vendor_location_uuid", FieldKind::String),
            FieldRule::required("service_ids", FieldKind::StringList)
                .with(&[Constraint::MinItems(1)]),
            FieldRule::required("start_time", FieldKind::String).with(&[Constraint::DateTime]),
            FieldRule::optional("staff_id", FieldKind::String),
            FieldRule::optional("notes", FieldKind::String).with(&[Constraint::MaxLength(500)]),
        ],
    };
}

/// Request body for `POST | PATCH /booking/cancel-booking`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    /// Part of the upstream path, not the forwarded body.
    #[serde(skip_serializing)]
    pub booking_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RequestSchema for CancelBookingRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "cancel-booking",
        fields: &[
            FieldRule::required("booking_id", FieldKind::String),
            FieldRule::optional("reason", FieldKind::String).with(&[Constraint::MaxLength(500)]),
        ],
    };
}

/// Request body for `POST /booking/calendar-links`.
#[derive(Debug, Deserialize)]
pub struct CalendarLinksRequest {
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RequestSchema for CalendarLinksRequest {
    const SCHEMA: &'static Schema = &Schema {
        name: "calendar-links",
        fields: &[
            FieldRule::required("title", FieldKind::String).with(&[Constraint::MaxLength(200)]),
            FieldRule::required("start", FieldKind::String).with(&[Constraint::DateTime]),
            FieldRule::required("end", FieldKind::String).with(&[Constraint::DateTime]),
            FieldRule::optional("location", FieldKind::String).with(&[Constraint::MaxLength(300)]),
            FieldRule::optional("description", FieldKind::String)
                .with(&[Constraint::MaxLength(1000)]),
        ],
    };
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/booking/get-locations
pub async fn get_locations(State(state): State<AppState>) -> ApiResult {
    let reply = state.partner.get_locations().await?;
    Ok(from_reply(reply, "Locations fetched successfully"))
}

/// GET /api/booking/get-products
pub async fn get_products(
    State(state): State<AppState>,
    LocationId(location): LocationId,
) -> ApiResult {
    let reply = state.partner.get_products(&location).await?;
    Ok(from_reply(reply, "Products fetched successfully"))
}

/// GET /api/booking/get-services/{business_id}
pub async fn get_services(
    State(state): State<AppState>,
    BusinessId(business_id): BusinessId,
) -> ApiResult {
    let reply = state.partner.get_services(&business_id).await?;
    Ok(from_reply(reply, "Services fetched successfully"))
}

/// POST /api/booking/get-slots/{business_id}
///
/// With `group_by_period` the partner's slot list is bucketed into
/// morning, afternoon and evening.
pub async fn get_slots(
    State(state): State<AppState>,
    BusinessId(business_id): BusinessId,
    ValidatedJson(input): ValidatedJson<SlotsRequest>,
) -> ApiResult {
    // Both are validated `YYYY-MM-DD`, which orders lexically.
    if input.end_date < input.start_date {
        return Err(ValidationFailed::single(
            "\"end_date\" must be on or after \"start_date\"",
        )
        .into());
    }

    let reply = state.partner.get_slots(&business_id, &input).await?;
    if !input.group_by_period {
        return Ok(from_reply(reply, "Slots fetched successfully"));
    }

    let Some(slots) = find_slot_list(&reply.data) else {
        tracing::warn!(
            %business_id,
            "Slot list not found in partner reply; returning it ungrouped"
        );
        return Ok(from_reply(reply, "Slots fetched successfully"));
    };
    let groups = group_slots_by_period(slots);
    tracing::debug!(%business_id, slots = groups.len(), "Grouped slots by period");

    let data = serde_json::to_value(&groups).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(build_success("Slots fetched successfully", data))
}

/// POST /api/booking/create-booking
///
/// The location comes from the `vendor_location_uuid` header, falling back
/// to the field of the same name in the body.
pub async fn create_booking(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    OptionalLocationId(header_location): OptionalLocationId,
    ValidatedJson(input): ValidatedJson<CreateBookingRequest>,
) -> ApiResult {
    let location = header_location
        .or_else(|| input.vendor_location_uuid.clone())
        .ok_or(AppError::MissingContext("Vendor location uuid"))?;

    let reply = state
        .partner
        .create_booking(&token, &location, &input)
        .await?;
    tracing::info!(%location, "Booking created");
    Ok(from_reply(reply, "Booking created successfully"))
}

/// POST | PATCH /api/booking/cancel-booking
pub async fn cancel_booking(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ValidatedJson(input): ValidatedJson<CancelBookingRequest>,
) -> ApiResult {
    let reply = state
        .partner
        .cancel_booking(&token, &input.booking_id, &input)
        .await?;
    tracing::info!(booking_id = %input.booking_id, "Booking cancelled");
    Ok(from_reply(reply, "Booking cancelled successfully"))
}

/// GET /api/booking/get-user-bookings
pub async fn get_user_bookings(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult {
    let reply = state.partner.get_user_bookings(&token).await?;
    Ok(from_reply(reply, "Bookings fetched successfully"))
}

/// POST /api/booking/calendar-links
///
/// Google, Outlook and iCalendar links for a booked appointment.
pub async fn calendar_links(
    ValidatedJson(input): ValidatedJson<CalendarLinksRequest>,
) -> ApiResult {
    let event = CalendarEvent::new(
        input.title,
        parse_timestamp("start", &input.start)?,
        parse_timestamp("end", &input.end)?,
        input.location,
        input.description,
    )?;

    let data =
        serde_json::to_value(event.links()).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(build_success("Calendar links generated", data))
}

fn parse_timestamp(field: &str, value: &str) -> Result<Timestamp, AppError> {
    DateTime::parse_from_rfc3339(value).map_err(|_| {
        ValidationFailed::single(format!("\"{field}\" must be a valid ISO 8601 date")).into()
    })
}
