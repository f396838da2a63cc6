/// Errors raised by the pure-logic helpers in `salon_core`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A clock string did not match the `H:MM AM|PM` shape.
    #[error("Malformed time string: {0:?}")]
    MalformedTimeString(String),

    /// A value was outside the range an operation accepts.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
