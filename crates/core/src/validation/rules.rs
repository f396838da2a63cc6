//! Validation schema and failure types.

use serde::de::DeserializeOwned;

/// Declarative description of one endpoint's request body.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Endpoint name, used only for logging.
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

/// Expected JSON shape of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    StringList,
    Object,
}

/// Additional checks applied after the kind check passes.
///
/// Length and pattern checks only apply to strings, `Min`/`Max` to numbers
/// and `MinItems` to lists; a constraint that does not fit the kind is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    Email,
    Pattern(&'static str),
    OneOf(&'static [&'static str]),
    Min(f64),
    Max(f64),
    MinItems(usize),
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
    /// RFC 3339 timestamp with offset.
    DateTime,
}

/// A rule for one named field of a request body.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub constraints: &'static [Constraint],
}

impl FieldRule {
    pub const fn required(field: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            kind,
            required: true,
            constraints: &[],
        }
    }

    pub const fn optional(field: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            kind,
            required: false,
            constraints: &[],
        }
    }

    pub const fn with(self, constraints: &'static [Constraint]) -> Self {
        Self {
            constraints,
            ..self
        }
    }
}

/// A typed request body paired with the schema that guards it.
pub trait RequestSchema: DeserializeOwned {
    const SCHEMA: &'static Schema;
}

/// Every field-level message collected during one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .messages.join(", "))]
pub struct ValidationFailed {
    pub messages: Vec<String>,
}

impl ValidationFailed {
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}
