//! Route definitions for the `/business` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::business;
use crate::state::AppState;

/// Routes mounted at `/business`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hours", get(business::hours))
        .route("/open-status", get(business::open_status))
}
