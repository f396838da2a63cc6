//! Schema interpreter. Pure logic, no I/O.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use validator::ValidateEmail;

use super::rules::{Constraint, FieldKind, FieldRule, Schema, ValidationFailed};

/// Compiled `Constraint::Pattern` sources. Schemas are static, so the map
/// only ever grows to the number of distinct patterns.
static PATTERNS: LazyLock<Mutex<HashMap<&'static str, Regex>>> = LazyLock::new(Default::default);

/// Validate a parsed request body against `schema`.
///
/// With no schema the body is returned unchanged. Otherwise every rule is
/// checked (no early exit), unknown fields are dropped and converted values
/// (trimmed strings, numeric strings, boolean strings) are returned.
pub fn validate(raw: &Value, schema: Option<&Schema>) -> Result<Value, ValidationFailed> {
    let Some(schema) = schema else {
        return Ok(raw.clone());
    };
    let Some(object) = raw.as_object() else {
        return Err(ValidationFailed::single("\"value\" must be of type object"));
    };

    let mut output = Map::new();
    let mut messages = Vec::new();

    for rule in schema.fields {
        match check_field(rule, object.get(rule.field)) {
            Ok(Some(value)) => {
                output.insert(rule.field.to_string(), value);
            }
            Ok(None) => {}
            Err(message) => messages.push(message),
        }
    }

    if messages.is_empty() {
        Ok(Value::Object(output))
    } else {
        Err(ValidationFailed { messages })
    }
}

/// Validate, then deserialize the sanitized body into `T`.
pub fn validate_into<T: DeserializeOwned>(
    raw: &Value,
    schema: &Schema,
) -> Result<T, ValidationFailed> {
    let sanitized = validate(raw, Some(schema))?;
    serde_json::from_value(sanitized)
        .map_err(|e| ValidationFailed::single(format!("\"value\" could not be read: {e}")))
}

fn check_field(rule: &FieldRule, value: Option<&Value>) -> Result<Option<Value>, String> {
    let field = rule.field;
    let value = match value {
        None | Some(Value::Null) if rule.required => {
            return Err(format!("\"{field}\" is required"));
        }
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let Some(converted) = convert(rule, value)? else {
        return Ok(None);
    };

    for constraint in rule.constraints {
        check_constraint(field, constraint, &converted)?;
    }

    Ok(Some(converted))
}

/// Check the value's kind, applying the lenient conversions. `Ok(None)`
/// means an optional string field was blank and is treated as absent.
fn convert(rule: &FieldRule, value: &Value) -> Result<Option<Value>, String> {
    let field = rule.field;
    let converted = match rule.kind {
        FieldKind::String => {
            let s = value
                .as_str()
                .ok_or_else(|| format!("\"{field}\" must be a string"))?
                .trim();
            if s.is_empty() {
                return if rule.required {
                    Err(format!("\"{field}\" is not allowed to be empty"))
                } else {
                    Ok(None)
                };
            }
            Value::String(s.to_string())
        }
        FieldKind::Number => match value {
            Value::Number(_) => value.clone(),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(number_value)
                .ok_or_else(|| format!("\"{field}\" must be a number"))?,
            _ => return Err(format!("\"{field}\" must be a number")),
        },
        FieldKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => value.clone(),
            Value::Number(n) if n.as_f64().is_some_and(|f| f.fract() == 0.0) => {
                number_value(n.as_f64().unwrap_or_default())
                    .ok_or_else(|| format!("\"{field}\" must be an integer"))?
            }
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("\"{field}\" must be an integer"))?,
            _ => return Err(format!("\"{field}\" must be an integer")),
        },
        FieldKind::Boolean => match value {
            Value::Bool(_) => value.clone(),
            Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Value::Bool(true),
            Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Value::Bool(false),
            _ => return Err(format!("\"{field}\" must be a boolean")),
        },
        FieldKind::StringList => {
            let items = value
                .as_array()
                .ok_or_else(|| format!("\"{field}\" must be an array"))?;
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let s = item
                    .as_str()
                    .ok_or_else(|| format!("\"{field}[{i}]\" must be a string"))?;
                out.push(Value::String(s.trim().to_string()));
            }
            Value::Array(out)
        }
        FieldKind::Object => {
            if !value.is_object() {
                return Err(format!("\"{field}\" must be of type object"));
            }
            value.clone()
        }
    };
    Ok(Some(converted))
}

/// Integral floats are stored as integers so they serialize without `.0`.
fn number_value(f: f64) -> Option<Value> {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(Value::from(f as i64))
    } else {
        Number::from_f64(f).map(Value::Number)
    }
}

fn check_constraint(field: &str, constraint: &Constraint, value: &Value) -> Result<(), String> {
    match (constraint, value) {
        (Constraint::MinLength(min), Value::String(s)) if s.chars().count() < *min => Err(format!(
            "\"{field}\" length must be at least {min} characters long"
        )),
        (Constraint::MaxLength(max), Value::String(s)) if s.chars().count() > *max => Err(format!(
            "\"{field}\" length must be less than or equal to {max} characters long"
        )),
        (Constraint::Email, Value::String(s)) if !s.to_string().validate_email() => {
            Err(format!("\"{field}\" must be a valid email"))
        }
        (Constraint::Pattern(pattern), Value::String(s)) => match compiled(*pattern) {
            Ok(re) if re.is_match(s) => Ok(()),
            // An unparseable pattern rejects everything.
            _ => Err(format!(
                "\"{field}\" with value \"{s}\" fails to match the required pattern: /{pattern}/"
            )),
        },
        (Constraint::OneOf(allowed), Value::String(s))
            if !allowed.iter().any(|a| *a == s.as_str()) =>
        {
            Err(format!("\"{field}\" must be one of [{}]", allowed.join(", ")))
        }
        (Constraint::Min(min), Value::Number(n)) if n.as_f64().is_some_and(|v| v < *min) => Err(
            format!("\"{field}\" must be greater than or equal to {min}"),
        ),
        (Constraint::Max(max), Value::Number(n)) if n.as_f64().is_some_and(|v| v > *max) => Err(
            format!("\"{field}\" must be less than or equal to {max}"),
        ),
        (Constraint::MinItems(min), Value::Array(items)) if items.len() < *min => Err(format!(
            "\"{field}\" must contain at least {min} items"
        )),
        (Constraint::Date, Value::String(s))
            if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() =>
        {
            Err(format!(
                "\"{field}\" must be a valid date in YYYY-MM-DD format"
            ))
        }
        (Constraint::DateTime, Value::String(s)) if DateTime::parse_from_rfc3339(s).is_err() => {
            Err(format!("\"{field}\" must be a valid ISO 8601 date"))
        }
        _ => Ok(()),
    }
}

fn compiled(pattern: &'static str) -> Result<Regex, regex::Error> {
    let mut cache = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(re) = cache.get(pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern)?;
    cache.insert(pattern, re.clone());
    Ok(re)
}
