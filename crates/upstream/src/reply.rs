//! Shared reply decoding and URL building for the upstream clients.

use serde_json::Value;
use url::Url;

use crate::error::UpstreamError;

/// A successful upstream reply.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    /// Message supplied by the service, if it sent one.
    pub message: Option<String>,
    /// The payload to hand back to the caller. `Null` when the service sent none.
    pub data: Value,
}

/// How a service shapes its successful replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReplyStyle {
    /// `{status, message, data}`; `status: false` is a rejection.
    Envelope,
    /// Arbitrary JSON returned as-is.
    Raw,
}

/// Decode a reply, turning non-2xx statuses and `status: false` envelopes
/// into [`UpstreamError::Rejected`].
pub(crate) async fn read_reply(
    service: &'static str,
    style: ReplyStyle,
    response: reqwest::Response,
) -> Result<UpstreamReply, UpstreamError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    let body: Option<Value> = if bytes.iter().all(u8::is_ascii_whitespace) {
        Some(Value::Null)
    } else {
        serde_json::from_slice(&bytes).ok()
    };

    if !status.is_success() {
        tracing::warn!(service, status = status.as_u16(), "Upstream returned an error status");
        return Err(UpstreamError::Rejected {
            service,
            status: status.as_u16(),
            message: body.as_ref().and_then(extract_message),
        });
    }

    let Some(body) = body else {
        return Err(UpstreamError::Decode {
            service,
            detail: format!("{} bytes of non-JSON content", bytes.len()),
        });
    };

    match style {
        ReplyStyle::Raw => Ok(UpstreamReply {
            message: None,
            data: body,
        }),
        ReplyStyle::Envelope => {
            if body.get("status").and_then(Value::as_bool) == Some(false) {
                tracing::warn!(service, "Upstream envelope reported failure");
                return Err(UpstreamError::Rejected {
                    service,
                    status: status.as_u16(),
                    message: extract_message(&body),
                });
            }
            let message = extract_message(&body);
            let data = match body {
                Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
                other => other,
            };
            Ok(UpstreamReply { message, data })
        }
    }
}

/// Pull a human-readable reason out of an error body.
///
/// Looks at `message`, then `error` (string or `{message}` object).
pub fn extract_message(body: &Value) -> Option<String> {
    let candidate = body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .or_else(|| {
            body.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })?;
    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse and check a configured base URL.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, UpstreamError> {
    let url =
        Url::parse(base_url).map_err(|_| UpstreamError::InvalidBaseUrl(base_url.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(UpstreamError::InvalidBaseUrl(base_url.to_string()));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, UpstreamError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UpstreamError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
