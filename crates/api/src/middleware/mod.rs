//! Request-context extractors.
//!
//! - [`context::BearerToken`] -- the caller's token from the `Authorization` header.
//! - [`context::LocationId`] -- the selected salon location, required.
//! - [`context::OptionalLocationId`] -- the selected salon location, if sent as a header.

pub mod context;
