//! Request-context extractors: the caller's bearer token, the selected
//! salon location and the business id path segment.
//!
//! These run before any body extractor, so a missing token is reported
//! ahead of body validation errors.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use salon_upstream::partner::LOCATION_HEADER;

use crate::error::AppError;

/// The caller's bearer token, forwarded unchanged to upstream services.
///
/// The `Bearer ` prefix is optional; a missing or blank header rejects with
/// `"Authorization token is required"`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// The `vendor_location_uuid` header, required.
#[derive(Debug, Clone)]
pub struct LocationId(pub String);

/// The `vendor_location_uuid` header for endpoints that also accept it in the body.
#[derive(Debug, Clone)]
pub struct OptionalLocationId(pub Option<String>);

/// The `{business_id}` path segment, trimmed and non-empty.
///
/// Path rejections (bad percent-encoding, invalid UTF-8) surface as failure
/// envelopes rather than axum's plain-text 400.
#[derive(Debug, Clone)]
pub struct BusinessId(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = header_text(&parts.headers, AUTHORIZATION.as_str())
            .ok_or(AppError::MissingContext("Authorization token"))?;

        let token = strip_bearer(raw);
        if token.is_empty() {
            return Err(AppError::MissingContext("Authorization token"));
        }
        Ok(BearerToken(token.to_string()))
    }
}

impl<S> FromRequestParts<S> for LocationId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_text(&parts.headers, LOCATION_HEADER)
            .map(|v| LocationId(v.to_string()))
            .ok_or(AppError::MissingContext("Vendor location uuid"))
    }
}

impl<S> FromRequestParts<S> for OptionalLocationId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalLocationId(
            header_text(&parts.headers, LOCATION_HEADER).map(str::to_string),
        ))
    }
}

impl<S> FromRequestParts<S> for BusinessId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection {
                PathRejection::MissingPathParams(_) => AppError::MissingContext("Business id"),
                other => {
                    tracing::debug!(error = %other.body_text(), "Unreadable business id");
                    AppError::MalformedBody("Business id is not valid".to_string())
                }
            })?;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::MissingContext("Business id"));
        }
        Ok(BusinessId(trimmed.to_string()))
    }
}

/// Trimmed, non-empty header value.
fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn strip_bearer(value: &str) -> &str {
    if value.eq_ignore_ascii_case("bearer") {
        return "";
    }
    match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::Request;

    async fn token_from(header: Option<&str>) -> Result<BearerToken, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn bearer_prefix_is_optional() {
        assert_eq!(token_from(Some("Bearer abc")).await.unwrap().0, "abc");
        assert_eq!(token_from(Some("bearer abc")).await.unwrap().0, "abc");
        assert_eq!(token_from(Some("abc")).await.unwrap().0, "abc");
    }

    #[tokio::test]
    async fn missing_or_blank_token_is_rejected() {
        for header in [None, Some(""), Some("   "), Some("Bearer ")] {
            assert_matches!(
                token_from(header).await,
                Err(AppError::MissingContext("Authorization token"))
            );
        }
    }

    #[tokio::test]
    async fn location_header_is_read() {
        let (mut parts, ()) = Request::builder()
            .header("vendor_location_uuid", " loc-1 ")
            .body(())
            .unwrap()
            .into_parts();
        let location = LocationId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(location.0, "loc-1");

        let (mut bare, ()) = Request::builder().body(()).unwrap().into_parts();
        assert_matches!(
            LocationId::from_request_parts(&mut bare, &()).await,
            Err(AppError::MissingContext("Vendor location uuid"))
        );
        let optional = OptionalLocationId::from_request_parts(&mut bare, &()).await.unwrap();
        assert_eq!(optional.0, None);
    }
}
