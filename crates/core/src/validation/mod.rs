//! Request-body validation engine.
//!
//! Endpoint schemas are declared as static rule tables ([`rules`]) and
//! interpreted by one generic function ([`evaluator::validate`]).

pub mod evaluator;
pub mod rules;

pub use evaluator::{validate, validate_into};
pub use rules::{Constraint, FieldKind, FieldRule, RequestSchema, Schema, ValidationFailed};
