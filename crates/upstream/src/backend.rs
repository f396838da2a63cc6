//! REST client for the salon backend service.
//!
//! Wraps the backend's auth, customer-profile and business-hours endpoints
//! using [`reqwest`]. Every reply is a `{status, message, data}` envelope.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::UpstreamError;
use crate::reply::{endpoint, parse_base_url, read_reply, ReplyStyle, UpstreamReply};

const SERVICE: &str = "backend";

/// Multipart field name the backend expects the profile photo under.
pub const PROFILE_IMAGE_FIELD: &str = "profile_image";

/// A file received from the browser, forwarded as one multipart part.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// HTTP client for the backend service.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a client for `base_url`, e.g. `https://api.salon.example/v1`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    // ---- auth ----

    pub async fn login<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        self.post_json(&["auth", "login"], None, body).await
    }

    pub async fn send_otp<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        self.post_json(&["auth", "send-otp"], None, body).await
    }

    pub async fn verify_otp<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        self.post_json(&["auth", "verify-otp"], None, body).await
    }

    pub async fn reset_password<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        self.post_json(&["auth", "reset-password"], None, body).await
    }

    pub async fn change_password<B: Serialize + ?Sized>(
        &self,
        token: &str,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        self.post_json(&["auth", "change-password"], Some(token), body)
            .await
    }

    /// Revoke the session behind `token`. The body is forwarded untouched.
    pub async fn logout(&self, token: &str, body: &Value) -> Result<UpstreamReply, UpstreamError> {
        self.post_json(&["auth", "logout"], Some(token), body).await
    }

    // ---- customers ----

    pub async fn create_customer<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        self.post_json(&["customers"], None, body).await
    }

    pub async fn get_profile(&self, token: &str) -> Result<UpstreamReply, UpstreamError> {
        self.get(&["customers", "profile"], Some(token)).await
    }

    /// Update the profile. Sent as multipart when a photo is attached,
    /// otherwise as JSON.
    pub async fn update_profile(
        &self,
        token: &str,
        fields: &Value,
        photo: Option<FileUpload>,
    ) -> Result<UpstreamReply, UpstreamError> {
        match photo {
            None => {
                self.post_json(&["customers", "profile"], Some(token), fields)
                    .await
            }
            Some(photo) => {
                let url = endpoint(&self.base_url, &["customers", "profile"])?;
                let form = build_profile_form(fields, photo)?;
                tracing::debug!(service = SERVICE, %url, "Sending multipart profile update");
                let response = self
                    .client
                    .post(url)
                    .bearer_auth(token)
                    .multipart(form)
                    .send()
                    .await?;
                read_reply(SERVICE, ReplyStyle::Envelope, response).await
            }
        }
    }

    pub async fn profile_setup<B: Serialize + ?Sized>(
        &self,
        token: &str,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        self.post_json(&["customers", "profile-setup"], Some(token), body)
            .await
    }

    // ---- business ----

    /// Today's opening interval, status and the weekly schedule.
    pub async fn business_hours(&self) -> Result<UpstreamReply, UpstreamError> {
        self.get(&["business", "hours"], None).await
    }

    // ---- private helpers ----

    async fn get(
        &self,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<UpstreamReply, UpstreamError> {
        let url = endpoint(&self.base_url, segments)?;
        tracing::debug!(service = SERVICE, %url, "GET");
        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        read_reply(SERVICE, ReplyStyle::Envelope, response).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        token: Option<&str>,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        let url = endpoint(&self.base_url, segments)?;
        tracing::debug!(service = SERVICE, %url, "POST");
        let mut request = self.client.post(url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        read_reply(SERVICE, ReplyStyle::Envelope, response).await
    }
}

/// Flatten validated profile fields into text parts plus the photo part.
fn build_profile_form(fields: &Value, photo: FileUpload) -> Result<Form, UpstreamError> {
    let mut form = Form::new();
    if let Value::Object(map) = fields {
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => continue,
                other => other.to_string(),
            };
            form = form.text(key.clone(), text);
        }
    }
    let part = Part::bytes(photo.bytes)
        .file_name(photo.file_name)
        .mime_str(&photo.content_type)?;
    Ok(form.part(PROFILE_IMAGE_FIELD, part))
}
