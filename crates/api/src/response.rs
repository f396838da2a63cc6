//! Uniform response envelope for every API endpoint.
//!
//! Success and failure share one shape,
//! `{ "status", "message", "data"?, "total"?, "fromCache" }`, and are always
//! sent with HTTP 200 so the frontend branches on `status` alone.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use salon_upstream::UpstreamReply;
use serde_json::Value;

use crate::error::AppError;

/// Public message used whenever the real cause must stay in the log.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

/// The envelope every handler answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Value>,
    pub from_cache: bool,
}

/// Handler return type: an envelope either way.
pub type ApiResult = Result<Envelope, AppError>;

/// Build a success envelope.
///
/// A falsy payload (`null`, `false`, `0`, `""`) yields no `data` key. An
/// object payload that carries `total` is treated as a paginated result and
/// split into `data` and `total`. Anything else becomes `data` as-is.
pub fn build_success(message: impl Into<String>, payload: Value) -> Envelope {
    let message = message.into();
    if is_falsy(&payload) {
        return Envelope {
            status: true,
            message,
            data: None,
            total: None,
            from_cache: false,
        };
    }

    let (data, total) = match payload {
        Value::Object(mut map) if map.contains_key("total") => {
            let total = map.remove("total");
            (map.remove("data"), total)
        }
        other => (Some(other), None),
    };

    Envelope {
        status: true,
        message,
        data,
        total,
        from_cache: false,
    }
}

/// Build a failure envelope and log it together with its cause.
pub fn build_failure(
    message: impl Into<String>,
    cause: Option<&dyn std::fmt::Display>,
) -> Envelope {
    let message = message.into();
    match cause {
        Some(cause) => tracing::warn!(%message, %cause, "Request failed"),
        None => tracing::info!(%message, "Request rejected"),
    }
    Envelope {
        status: false,
        message,
        data: None,
        total: None,
        from_cache: false,
    }
}

/// Success envelope for an upstream reply, preferring the service's own message.
pub fn from_reply(reply: UpstreamReply, default_message: &str) -> Envelope {
    let message = reply
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default_message.to_string());
    build_success(message, reply.data)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paginated_payload_is_split() {
        let env = build_success("ok", json!({"data": [1, 2], "total": 2}));
        assert_eq!(env.data, Some(json!([1, 2])));
        assert_eq!(env.total, Some(json!(2)));
    }

    #[test]
    fn falsy_payloads_have_no_data() {
        for payload in [json!(null), json!(false), json!(0), json!("")] {
            let env = build_success("done", payload);
            assert!(env.status);
            assert_eq!(env.data, None);
            assert_eq!(env.total, None);
        }
    }

    #[test]
    fn empty_array_is_still_data() {
        let env = build_success("none found", json!([]));
        assert_eq!(env.data, Some(json!([])));
    }

    #[test]
    fn wire_shape_uses_camel_case_and_omits_absent_keys() {
        let wire = serde_json::to_value(build_failure("nope", None)).unwrap();
        assert_eq!(
            wire,
            json!({"status": false, "message": "nope", "fromCache": false})
        );
    }

    #[test]
    fn success_wire_shape_carries_data() {
        let wire = serde_json::to_value(build_success("ok", json!({"a": 1}))).unwrap();
        assert_eq!(
            wire,
            json!({"status": true, "message": "ok", "data": {"a": 1}, "fromCache": false})
        );
    }

    #[test]
    fn reply_message_wins_over_default() {
        let reply = UpstreamReply {
            message: Some("Logged in".into()),
            data: json!({"token": "t"}),
        };
        assert_eq!(from_reply(reply, "Login successful").message, "Logged in");

        let blank = UpstreamReply {
            message: Some("  ".into()),
            data: json!(null),
        };
        assert_eq!(from_reply(blank, "Done").message, "Done");
    }
}
