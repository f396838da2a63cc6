//! Body extractors that parse and validate request bodies.
//!
//! All rejections are [`AppError`]s, so a bad body becomes a failure
//! envelope like any other error.

use std::marker::PhantomData;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use salon_core::validation::{validate, validate_into, RequestSchema, ValidationFailed};
use salon_upstream::backend::PROFILE_IMAGE_FIELD;
use salon_upstream::FileUpload;
use serde_json::{json, Map, Value};

use crate::error::AppError;

/// A JSON body validated against `T::SCHEMA` and deserialized into `T`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

/// Any well-formed JSON body, forwarded without a schema.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

/// Profile fields sent either as JSON or as `multipart/form-data` with an
/// optional `profile_image` part. Text fields are validated with `T::SCHEMA`
/// in both cases.
#[derive(Debug)]
pub struct ProfileForm<T> {
    /// Sanitized fields, ready to forward.
    pub fields: Value,
    pub photo: Option<FileUpload>,
    schema: PhantomData<fn() -> T>,
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: RequestSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let raw = read_json(req, state).await?;
        let value = validate_into::<T>(&raw, T::SCHEMA).map_err(|e| {
            tracing::debug!(schema = T::SCHEMA.name, error = %e, "Request body failed validation");
            AppError::from(e)
        })?;
        Ok(ValidatedJson(value))
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let raw = read_json(req, state).await?;
        Ok(JsonBody(validate(&raw, None)?))
    }
}

impl<S, T> FromRequest<S> for ProfileForm<T>
where
    T: RequestSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::MalformedBody(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let raw = read_json(req, state).await?;
        let fields = validate(&raw, Some(T::SCHEMA))?;
        Ok(ProfileForm {
            fields,
            photo: None,
            schema: PhantomData,
        })
    }
}

/// Parse a raw body as JSON. An empty body reads as `{}`.
pub fn parse_json_body(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(bytes)
        .map_err(|e| AppError::MalformedBody(format!("Invalid JSON body: {e}")))
}

async fn read_json<S: Send + Sync>(req: Request, state: &S) -> Result<Value, AppError> {
    let bytes = Bytes::from_request(req, state)
        .await
        .map_err(|e| AppError::MalformedBody(e.body_text()))?;
    parse_json_body(&bytes)
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
}

async fn read_multipart<T: RequestSchema>(
    mut multipart: Multipart,
) -> Result<ProfileForm<T>, AppError> {
    let mut fields = Map::new();
    let mut photo = None;
    let mut photo_messages = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == PROFILE_IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_string).filter(|n| !n.is_empty());
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;

            // Browsers send an empty part when no file was chosen.
            let Some(file_name) = file_name.filter(|_| !bytes.is_empty()) else {
                continue;
            };
            if !content_type.starts_with("image/") {
                photo_messages.push(format!("\"{PROFILE_IMAGE_FIELD}\" must be an image"));
                continue;
            }
            photo = Some(FileUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else if !name.is_empty() {
            let text = field.text().await.map_err(multipart_error)?;
            fields.insert(name, Value::String(text));
        }
    }

    let fields = match validate(&Value::Object(fields), Some(T::SCHEMA)) {
        Ok(fields) if photo_messages.is_empty() => fields,
        Ok(_) => return Err(ValidationFailed { messages: photo_messages }.into()),
        Err(mut failed) => {
            failed.messages.extend(photo_messages);
            return Err(failed.into());
        }
    };

    tracing::debug!(
        schema = T::SCHEMA.name,
        has_photo = photo.is_some(),
        "Parsed multipart profile form"
    );
    Ok(ProfileForm {
        fields,
        photo,
        schema: PhantomData,
    })
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::MalformedBody(format!("\"{PROFILE_IMAGE_FIELD}\" exceeds the upload size limit"))
    } else {
        AppError::MalformedBody(format!("Invalid multipart body: {}", err.body_text()))
    }
}
