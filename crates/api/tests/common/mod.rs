#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use httpmock::MockServer;
use serde_json::Value;
use tokio::sync::watch;
use tower::ServiceExt;

use salon_api::background::open_status::{self, OpeningSnapshot};
use salon_api::config::ServerConfig;
use salon_api::router::build_app_router;
use salon_api::state::AppState;
use salon_upstream::{BackendClient, PartnerClient};

pub const PARTNER_API_KEY: &str = "test-partner-key";

/// Build a test `ServerConfig` pointing at the given upstream mocks.
pub fn test_config(backend_url: &str, partner_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        backend_base_url: backend_url.to_string(),
        partner_base_url: partner_url.to_string(),
        partner_api_key: PARTNER_API_KEY.to_string(),
        upstream_timeout_secs: 5,
        salon_timezone: chrono_tz::UTC,
        open_status_refresh_secs: 60,
        max_upload_bytes: 1024 * 1024,
    }
}

/// A fully wired application with both upstream services mocked.
pub struct TestApp {
    pub router: Router,
    pub backend: MockServer,
    pub partner: MockServer,
    /// Publishes snapshots the way the background monitor would.
    pub open_status: watch::Sender<OpeningSnapshot>,
}

/// Build the full application router with all middleware layers.
///
/// Uses the same `build_app_router` as `main.rs`, so integration tests
/// exercise the production middleware stack.
pub async fn spawn_app() -> TestApp {
    let backend = MockServer::start_async().await;
    let partner = MockServer::start_async().await;
    let config = test_config(&backend.base_url(), &partner.base_url());

    let timeout = Duration::from_secs(config.upstream_timeout_secs);
    let (sender, receiver) = open_status::channel();
    let state = AppState {
        config: Arc::new(config.clone()),
        backend: Arc::new(BackendClient::new(&config.backend_base_url, timeout).unwrap()),
        partner: Arc::new(
            PartnerClient::new(&config.partner_base_url, &config.partner_api_key, timeout).unwrap(),
        ),
        open_status: receiver,
    };

    TestApp {
        router: build_app_router(state, &config),
        backend,
        partner,
        open_status: sender,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
        let mut builder = Request::get(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Response<Body> {
        self.send_json("POST", uri, headers, body).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: &str,
        body: impl Into<Body>,
    ) -> Response<Body> {
        let request = Request::post(uri)
            .header("content-type", content_type)
            .body(body.into())
            .unwrap();
        self.send(request).await
    }
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
