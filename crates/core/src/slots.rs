//! Grouping of booking-partner availability into morning/afternoon/evening.
//!
//! The partner returns slots as JSON objects carrying a `start_time` (or
//! `start`) that is either an RFC 3339 timestamp or a clock string such as
//! `"2:30 PM"`. Bare strings are accepted as slots too.

use chrono::DateTime;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::time::{
    classify_period, minutes_since_midnight, minutes_to_time_string, time_string_to_minutes,
    DayPeriod,
};
use crate::types::MinuteOffset;

/// Keys checked, in order, for a slot's start.
const START_KEYS: [&str; 2] = ["start_time", "start"];

/// Keys under which the partner may nest the slot list.
const LIST_KEYS: [&str; 2] = ["slots", "data"];

/// Slots bucketed by [`DayPeriod`], each enriched with `label` and `period`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotGroups {
    pub morning: Vec<Value>,
    pub afternoon: Vec<Value>,
    pub evening: Vec<Value>,
}

impl SlotGroups {
    pub fn len(&self) -> usize {
        self.morning.len() + self.afternoon.len() + self.evening.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse a start value into minutes since midnight in the slot's own timezone.
pub fn parse_start(value: &str) -> Option<MinuteOffset> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(minutes_since_midnight(ts.time()));
    }
    time_string_to_minutes(value).ok()
}

fn slot_start(slot: &Value) -> Option<MinuteOffset> {
    match slot {
        Value::String(s) => parse_start(s),
        Value::Object(map) => START_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .and_then(parse_start),
        _ => None,
    }
}

/// Locate the slot array inside a partner payload.
///
/// Accepts a bare array, or an object nesting it under `slots` or `data`
/// (one level deep, e.g. `{"data": {"slots": [...]}}`).
pub fn find_slot_list(payload: &Value) -> Option<&Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => LIST_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|nested| match nested {
                Value::Array(items) => Some(items),
                Value::Object(_) => find_slot_list(nested),
                _ => None,
            }),
        _ => None,
    }
}

/// Bucket slots by period, keeping their original order. Slots whose start
/// cannot be read are skipped.
pub fn group_slots_by_period(slots: &[Value]) -> SlotGroups {
    let mut groups = SlotGroups::default();

    for slot in slots {
        let Some(minutes) = slot_start(slot) else {
            continue;
        };
        let Ok(label) = minutes_to_time_string(minutes) else {
            continue;
        };
        let period = classify_period(minutes);

        let mut enriched = match slot {
            Value::Object(map) => map.clone(),
            other => {
                let mut map = Map::new();
                map.insert("start_time".to_string(), other.clone());
                map
            }
        };
        enriched.insert("label".to_string(), Value::String(label));
        enriched.insert("period".to_string(), Value::String(period.as_str().to_string()));

        let bucket = match period {
            DayPeriod::Morning => &mut groups.morning,
            DayPeriod::Afternoon => &mut groups.afternoon,
            DayPeriod::Evening => &mut groups.evening,
        };
        bucket.push(Value::Object(enriched));
    }

    groups
}
