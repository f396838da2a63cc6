//! Route definitions for the `/booking` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/booking`.
///
/// ```text
/// GET         /get-locations              -> get_locations
/// GET         /get-products               -> get_products
/// GET         /get-services/{business_id} -> get_services
/// POST        /get-slots/{business_id}    -> get_slots
/// POST        /create-booking             -> create_booking
/// POST, PATCH /cancel-booking             -> cancel_booking
/// GET         /get-user-bookings          -> get_user_bookings
/// POST        /calendar-links             -> calendar_links
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get-locations", get(booking::get_locations))
        .route("/get-products", get(booking::get_products))
        .route("/get-services/{business_id}", get(booking::get_services))
        .route("/get-slots/{business_id}", post(booking::get_slots))
        .route("/create-booking", post(booking::create_booking))
        .route(
            "/cancel-booking",
            post(booking::cancel_booking).patch(booking::cancel_booking),
        )
        .route("/get-user-bookings", get(booking::get_user_bookings))
        .route("/calendar-links", post(booking::calendar_links))
}
