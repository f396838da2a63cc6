//! Periodic open/closed re-evaluation.
//!
//! Fetches business hours from the backend on a fixed interval, evaluates
//! them against the salon's wall clock and publishes the result into a
//! `watch` channel. Request handlers only ever read the latest snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use salon_core::hours::{evaluate_opening, BusinessHoursStatus, OpeningState};
use salon_core::types::Timestamp;
use salon_upstream::BackendClient;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// The most recent evaluation of whether the salon is open.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpeningSnapshot {
    pub state: OpeningState,
    pub is_open: bool,
    /// Today's interval as reported by the backend.
    pub today_hour: Option<String>,
    /// `None` until the first check has run.
    pub checked_at: Option<Timestamp>,
}

impl Default for OpeningSnapshot {
    fn default() -> Self {
        Self {
            state: OpeningState::Closed,
            is_open: false,
            today_hour: None,
            checked_at: None,
        }
    }
}

/// Create the channel the monitor writes and handlers read.
pub fn channel() -> (watch::Sender<OpeningSnapshot>, watch::Receiver<OpeningSnapshot>) {
    watch::channel(OpeningSnapshot::default())
}

/// `at` on the salon's wall clock. The offset is resolved per instant, so
/// daylight saving transitions are followed.
pub fn wall_clock(tz: Tz, at: DateTime<Utc>) -> Timestamp {
    at.with_timezone(&tz).fixed_offset()
}

/// Evaluate a backend hours payload at `now`.
///
/// A payload that does not read as [`BusinessHoursStatus`] is treated as
/// missing data, i.e. closed.
pub fn evaluate_payload(payload: &Value, now: Timestamp) -> OpeningSnapshot {
    let hours = serde_json::from_value::<BusinessHoursStatus>(payload.clone()).ok();
    let state = evaluate_opening(hours.as_ref(), now.time());
    OpeningSnapshot {
        state,
        is_open: state.is_open(),
        today_hour: hours.and_then(|h| h.today_hour),
        checked_at: Some(now),
    }
}

/// Fetch and evaluate once. Fetch failures evaluate as closed.
pub async fn check_once(backend: &BackendClient, tz: Tz) -> OpeningSnapshot {
    let now = wall_clock(tz, Utc::now());
    match backend.business_hours().await {
        Ok(reply) => evaluate_payload(&reply.data, now),
        Err(e) => {
            tracing::warn!(error = %e, "Open status: failed to fetch business hours");
            OpeningSnapshot {
                checked_at: Some(now),
                ..OpeningSnapshot::default()
            }
        }
    }
}

/// Run the open-status monitor loop until `cancel` is triggered.
pub async fn run(
    backend: Arc<BackendClient>,
    tz: Tz,
    every: Duration,
    sender: watch::Sender<OpeningSnapshot>,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = every.as_secs(), "Open status monitor started");

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Open status monitor stopping");
                break;
            }
            _ = interval.tick() => {
                let snapshot = check_once(&backend, tz).await;
                let state = snapshot.state;
                let previous = sender.send_replace(snapshot);
                if previous.state != state || previous.checked_at.is_none() {
                    tracing::info!(?state, "Open status changed");
                } else {
                    tracing::debug!(?state, "Open status unchanged");
                }
            }
        }
    }
}
