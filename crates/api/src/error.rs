use axum::response::{IntoResponse, Response};
use salon_core::error::CoreError;
use salon_core::validation::ValidationFailed;
use salon_upstream::UpstreamError;

use crate::response::{build_failure, Envelope, GENERIC_FAILURE_MESSAGE};

/// Application-level error type for HTTP handlers.
///
/// Every variant is rendered through [`build_failure`], so callers always
/// receive HTTP 200 with `status: false` and a message that is safe to show.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required header (token, location) was absent or blank.
    #[error("{0} is required")]
    MissingContext(&'static str),

    /// The request body failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationFailed),

    /// The body could not be parsed at all.
    #[error("{0}")]
    MalformedBody(String),

    /// An upstream service failed or refused the request.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// A domain-level error from `salon_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An internal error; only the generic message reaches the caller.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Convert into the failure envelope, logging the underlying cause.
    pub fn into_envelope(self) -> Envelope {
        match &self {
            AppError::MissingContext(_) | AppError::Validation(_) | AppError::MalformedBody(_) => {
                build_failure(self.to_string(), None)
            }
            AppError::Core(core) => match core {
                CoreError::InvalidInput(msg) => build_failure(capitalize(msg), None),
                CoreError::MalformedTimeString(_) => build_failure(self.to_string(), None),
            },
            AppError::Upstream(err) => {
                let message = err.service_message().unwrap_or(GENERIC_FAILURE_MESSAGE);
                build_failure(message, Some(err))
            }
            AppError::Internal(_) => build_failure(GENERIC_FAILURE_MESSAGE, Some(&self)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_envelope().into_response()
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
