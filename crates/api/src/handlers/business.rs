//! Handlers for the `/business` resource: opening hours and open/closed status.

use axum::extract::State;
use serde_json::json;

use crate::background::open_status::evaluate_payload;
use crate::error::AppError;
use crate::response::{build_success, ApiResult};
use crate::state::AppState;

/// GET /api/business/hours
///
/// Backend hours plus a fresh open/closed evaluation at the salon's
/// wall-clock time.
pub async fn hours(State(state): State<AppState>) -> ApiResult {
    let reply = state.backend.business_hours().await?;
    let snapshot = evaluate_payload(&reply.data, state.salon_now());

    let message = reply
        .message
        .unwrap_or_else(|| "Business hours fetched successfully".to_string());
    Ok(build_success(
        message,
        json!({
            "hours": reply.data,
            "today_opening_status_now": snapshot.state,
            "is_open": snapshot.is_open,
            "checked_at": snapshot.checked_at,
        }),
    ))
}

/// GET /api/business/open-status
///
/// The latest snapshot published by the background monitor; never calls
/// the backend itself.
pub async fn open_status(State(state): State<AppState>) -> ApiResult {
    let snapshot = state.open_status.borrow().clone();
    let data = serde_json::to_value(&snapshot).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(build_success("Open status fetched successfully", data))
}
