use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salon_api::background::open_status;
use salon_api::config::ServerConfig;
use salon_api::router::build_app_router;
use salon_api::state::AppState;
use salon_upstream::{BackendClient, PartnerClient};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = %config.backend_base_url,
        partner = %config.partner_base_url,
        timezone = %config.salon_timezone,
        "Loaded server configuration"
    );

    // --- Upstream clients ---
    let upstream_timeout = Duration::from_secs(config.upstream_timeout_secs);
    let backend = Arc::new(
        BackendClient::new(&config.backend_base_url, upstream_timeout)
            .expect("Invalid BACKEND_BASE_URL"),
    );
    let partner = Arc::new(
        PartnerClient::new(
            &config.partner_base_url,
            &config.partner_api_key,
            upstream_timeout,
        )
        .expect("Invalid PARTNER_BASE_URL"),
    );

    // --- Open-status monitor ---
    let (status_tx, status_rx) = open_status::channel();
    let monitor_cancel = CancellationToken::new();
    let monitor_handle = tokio::spawn(open_status::run(
        Arc::clone(&backend),
        config.salon_timezone,
        Duration::from_secs(config.open_status_refresh_secs.max(1)),
        status_tx,
        monitor_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        backend,
        partner,
        open_status: status_rx,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    monitor_cancel.cancel();
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(shutdown_timeout, monitor_handle)
        .await
        .is_err()
    {
        tracing::warn!("Open status monitor did not stop in time");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` selects JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "salon_api=debug,salon_upstream=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
