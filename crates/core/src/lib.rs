//! Pure domain logic for the salon booking gateway.
//!
//! Nothing in this crate performs I/O: the API crate feeds it request bodies,
//! upstream payloads and the current wall-clock time.

pub mod calendar;
pub mod error;
pub mod hours;
pub mod slots;
pub mod time;
pub mod types;
pub mod validation;
