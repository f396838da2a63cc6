pub mod auth;
pub mod booking;
pub mod business;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login
/// /auth/send-otp                       send one-time password
/// /auth/verify-otp                     verify one-time password
/// /auth/reset-password                 reset password with OTP
/// /auth/change-password                change password (bearer)
/// /auth/create-customer                register
/// /auth/get-profile                    profile (bearer)
/// /auth/update-profile                 POST | PATCH, JSON or multipart (bearer)
/// /auth/profile-setup                  first-time profile (bearer)
/// /auth/logout                         logout (bearer)
///
/// /booking/get-locations               partner locations
/// /booking/get-products                products (location header)
/// /booking/get-services/{business_id}  service menu
/// /booking/get-slots/{business_id}     availability
/// /booking/create-booking              book (bearer + location)
/// /booking/cancel-booking              POST | PATCH (bearer)
/// /booking/get-user-bookings           caller's bookings (bearer)
/// /booking/calendar-links              add-to-calendar links
///
/// /business/hours                      hours + open/closed now
/// /business/open-status                latest monitor snapshot
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/booking", booking::router())
        .nest("/business", business::router())
}
