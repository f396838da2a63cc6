//! Request handlers, grouped by resource. Each module also defines the
//! request bodies it accepts and their validation schemas.

pub mod auth;
pub mod booking;
pub mod business;
