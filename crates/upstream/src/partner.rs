//! REST client for the third-party booking partner.
//!
//! Every request carries the partner API key. User-scoped calls forward the
//! customer's bearer token, and location-scoped calls forward the selected
//! salon location in the `vendor_location_uuid` header.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::Serialize;
use url::Url;

use crate::error::UpstreamError;
use crate::reply::{endpoint, parse_base_url, read_reply, ReplyStyle, UpstreamReply};

const SERVICE: &str = "booking-partner";

/// Header carrying the partner API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header selecting the active salon location.
pub const LOCATION_HEADER: &str = "vendor_location_uuid";

/// HTTP client for the booking partner.
#[derive(Debug, Clone)]
pub struct PartnerClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

/// Per-call context forwarded to the partner.
#[derive(Debug, Clone, Copy, Default)]
struct Forwarded<'a> {
    token: Option<&'a str>,
    location: Option<&'a str>,
}

impl PartnerClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        api_key: &str,
    ) -> Result<Self, UpstreamError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            api_key: api_key.to_string(),
        })
    }

    /// All salon locations bookable through the partner.
    pub async fn get_locations(&self) -> Result<UpstreamReply, UpstreamError> {
        self.get(&["locations"], Forwarded::default()).await
    }

    /// Retail products sold at `location`.
    pub async fn get_products(&self, location: &str) -> Result<UpstreamReply, UpstreamError> {
        let ctx = Forwarded {
            location: Some(location),
            ..Forwarded::default()
        };
        self.get(&["products"], ctx).await
    }

    /// Service menu for one business.
    pub async fn get_services(&self, business_id: &str) -> Result<UpstreamReply, UpstreamError> {
        self.get(&["businesses", business_id, "services"], Forwarded::default())
            .await
    }

    /// Open slots for a date range and a set of services.
    pub async fn get_slots<B: Serialize + ?Sized>(
        &self,
        business_id: &str,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        self.post(
            &["businesses", business_id, "slots"],
            Forwarded::default(),
            body,
        )
        .await
    }

    pub async fn create_booking<B: Serialize + ?Sized>(
        &self,
        token: &str,
        location: &str,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        let ctx = Forwarded {
            token: Some(token),
            location: Some(location),
        };
        self.post(&["bookings"], ctx, body).await
    }

    pub async fn cancel_booking<B: Serialize + ?Sized>(
        &self,
        token: &str,
        booking_id: &str,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        let ctx = Forwarded {
            token: Some(token),
            ..Forwarded::default()
        };
        self.post(&["bookings", booking_id, "cancel"], ctx, body)
            .await
    }

    /// Bookings belonging to the customer behind `token`.
    pub async fn get_user_bookings(&self, token: &str) -> Result<UpstreamReply, UpstreamError> {
        let ctx = Forwarded {
            token: Some(token),
            ..Forwarded::default()
        };
        self.get(&["bookings"], ctx).await
    }

    // ---- private helpers ----

    fn decorate(&self, request: RequestBuilder, ctx: Forwarded<'_>) -> RequestBuilder {
        let mut request = request.header(API_KEY_HEADER, &self.api_key);
        if let Some(token) = ctx.token {
            request = request.bearer_auth(token);
        }
        if let Some(location) = ctx.location {
            request = request.header(LOCATION_HEADER, location);
        }
        request
    }

    async fn get(
        &self,
        segments: &[&str],
        ctx: Forwarded<'_>,
    ) -> Result<UpstreamReply, UpstreamError> {
        let url = endpoint(&self.base_url, segments)?;
        tracing::debug!(service = SERVICE, %url, "GET");
        let response = self.decorate(self.client.get(url), ctx).send().await?;
        read_reply(SERVICE, ReplyStyle::Raw, response).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        ctx: Forwarded<'_>,
        body: &B,
    ) -> Result<UpstreamReply, UpstreamError> {
        let url = endpoint(&self.base_url, segments)?;
        tracing::debug!(service = SERVICE, %url, "POST");
        let response = self
            .decorate(self.client.post(url).json(body), ctx)
            .send()
            .await?;
        read_reply(SERVICE, ReplyStyle::Raw, response).await
    }
}
