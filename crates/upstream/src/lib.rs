//! HTTP clients for the services the gateway proxies to.
//!
//! - [`backend::BackendClient`] -- the salon's own backend (auth, customer
//!   profile, business hours). Replies with a `{status, message, data}` envelope.
//! - [`partner::PartnerClient`] -- the third-party booking partner
//!   (locations, products, services, slots, bookings). Replies with raw JSON.
//!
//! Both clients make exactly one request per call and never retry.

pub mod backend;
pub mod error;
pub mod partner;
pub mod reply;

pub use backend::{BackendClient, FileUpload};
pub use error::UpstreamError;
pub use partner::PartnerClient;
pub use reply::UpstreamReply;
