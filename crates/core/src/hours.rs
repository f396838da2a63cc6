//! Business-hours status and the open/closed evaluator.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::time::{minutes_since_midnight, time_string_to_minutes};
use crate::types::MinuteOffset;

/// Status string the backend uses for a day with opening hours.
pub const STATUS_OPEN: &str = "Open";

/// Literal the backend puts in `today_hour` when the salon is shut all day.
pub const NOT_OPEN: &str = "not open";

/// Separator between the opening and closing time in `today_hour`.
const INTERVAL_SEPARATOR: &str = " - ";

/// Business hours as reported by the backend service.
///
/// Only `today_hour` and `today_opening_status` are interpreted; the
/// per-weekday entries are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessHoursStatus {
    #[serde(default)]
    pub today_hour: Option<String>,
    #[serde(default)]
    pub today_opening_status: Option<String>,
    #[serde(flatten)]
    pub weekly: BTreeMap<String, serde_json::Value>,
}

/// Result of evaluating business hours against the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpeningState {
    Open,
    Closed,
}

impl OpeningState {
    pub fn is_open(self) -> bool {
        self == OpeningState::Open
    }
}

/// Split an `"H:MM AM - H:MM PM"` interval into its opening and closing minutes.
pub fn parse_opening_interval(interval: &str) -> Result<(MinuteOffset, MinuteOffset), CoreError> {
    let (open, close) = interval
        .split_once(INTERVAL_SEPARATOR)
        .ok_or_else(|| CoreError::MalformedTimeString(interval.to_string()))?;
    Ok((time_string_to_minutes(open)?, time_string_to_minutes(close)?))
}

/// Decide whether the salon is open at `now`.
///
/// Both the opening and the closing minute count as open. Missing data or
/// an unparseable interval resolves to [`OpeningState::Closed`].
pub fn evaluate_opening(hours: Option<&BusinessHoursStatus>, now: NaiveTime) -> OpeningState {
    let Some(hours) = hours else {
        return OpeningState::Closed;
    };
    if hours.today_opening_status.as_deref() != Some(STATUS_OPEN) {
        return OpeningState::Closed;
    }
    let interval = match hours.today_hour.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() && !value.eq_ignore_ascii_case(NOT_OPEN) => value,
        _ => return OpeningState::Closed,
    };

    match parse_opening_interval(interval) {
        Ok((open, close)) => {
            let current = minutes_since_midnight(now);
            if open <= current && current <= close {
                OpeningState::Open
            } else {
                OpeningState::Closed
            }
        }
        Err(_) => OpeningState::Closed,
    }
}
