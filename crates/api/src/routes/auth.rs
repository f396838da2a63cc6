//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST        /login            -> login
/// POST        /send-otp         -> send_otp
/// POST        /verify-otp       -> verify_otp
/// POST        /reset-password   -> reset_password
/// POST        /change-password  -> change_password
/// POST        /create-customer  -> create_customer
/// GET         /get-profile      -> get_profile
/// POST, PATCH /update-profile   -> update_profile
/// POST        /profile-setup    -> profile_setup
/// POST        /logout           -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/send-otp", post(auth::send_otp))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/reset-password", post(auth::reset_password))
        .route("/change-password", post(auth::change_password))
        .route("/create-customer", post(auth::create_customer))
        .route("/get-profile", get(auth::get_profile))
        .route(
            "/update-profile",
            post(auth::update_profile).patch(auth::update_profile),
        )
        .route("/profile-setup", post(auth::profile_setup))
        .route("/logout", post(auth::logout))
}
