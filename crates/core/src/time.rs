//! Conversions between `H:MM AM|PM` clock strings and minute offsets.
//!
//! Clock strings carry no timezone; callers interpret them in the salon's
//! local wall-clock time.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{MinuteOffset, MINUTES_PER_DAY};

/// Coarse part of the day a slot falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
}

impl DayPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            DayPeriod::Morning => "morning",
            DayPeriod::Afternoon => "afternoon",
            DayPeriod::Evening => "evening",
        }
    }
}

/// Format a minute offset as a clock string, e.g. `780` -> `"1:00 PM"`.
///
/// Offsets past the end of the day are rejected rather than wrapped.
pub fn minutes_to_time_string(minutes: MinuteOffset) -> Result<String, CoreError> {
    if minutes >= MINUTES_PER_DAY {
        return Err(CoreError::InvalidInput(format!(
            "minute offset {minutes} is outside 0..=1439"
        )));
    }

    let hours = (minutes / 60) % 24;
    let mins = minutes % 60;
    let meridiem = if hours >= 12 { "PM" } else { "AM" };
    let display_hour = match hours {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };

    Ok(format!("{display_hour}:{mins:02} {meridiem}"))
}

/// Parse a clock string such as `"9:30 am"` into minutes since midnight.
///
/// The meridiem is case-insensitive; minutes must be two digits.
pub fn time_string_to_minutes(value: &str) -> Result<MinuteOffset, CoreError> {
    let malformed = || CoreError::MalformedTimeString(value.to_string());

    let mut tokens = value.split_whitespace();
    let (time, meridiem) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(time), Some(meridiem), None) => (time, meridiem),
        _ => return Err(malformed()),
    };

    let (hour_part, minute_part) = time.split_once(':').ok_or_else(malformed)?;
    if hour_part.is_empty()
        || hour_part.len() > 2
        || minute_part.len() != 2
        || !hour_part.bytes().all(|b| b.is_ascii_digit())
        || !minute_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }

    let mut hours: u32 = hour_part.parse().map_err(|_| malformed())?;
    let minutes: u32 = minute_part.parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&hours) || minutes > 59 {
        return Err(malformed());
    }

    if meridiem.eq_ignore_ascii_case("PM") {
        if hours != 12 {
            hours += 12;
        }
    } else if meridiem.eq_ignore_ascii_case("AM") {
        if hours == 12 {
            hours = 0;
        }
    } else {
        return Err(malformed());
    }

    Ok(hours * 60 + minutes)
}

/// Bucket a minute offset into morning (< 12h), afternoon (< 17h) or evening.
pub fn classify_period(minutes: MinuteOffset) -> DayPeriod {
    let hour = minutes / 60;
    if hour < 12 {
        DayPeriod::Morning
    } else if hour < 17 {
        DayPeriod::Afternoon
    } else {
        DayPeriod::Evening
    }
}

/// Minutes since midnight for a wall-clock time. Seconds are dropped.
pub fn minutes_since_midnight(time: NaiveTime) -> MinuteOffset {
    time.hour() * 60 + time.minute()
}
