use std::sync::Arc;

use chrono::Utc;
use salon_core::types::Timestamp;
use salon_upstream::{BackendClient, PartnerClient};
use tokio::sync::watch;

use crate::background::open_status::{wall_clock, OpeningSnapshot};
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the salon backend service.
    pub backend: Arc<BackendClient>,
    /// Client for the booking partner API.
    pub partner: Arc<PartnerClient>,
    /// Latest open/closed snapshot published by the background monitor.
    pub open_status: watch::Receiver<OpeningSnapshot>,
}

impl AppState {
    /// Current time on the salon's wall clock.
    pub fn salon_now(&self) -> Timestamp {
        wall_clock(self.config.salon_timezone, Utc::now())
    }
}
