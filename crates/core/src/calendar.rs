//! "Add to calendar" links for a confirmed booking.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use url::form_urlencoded;
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::Timestamp;

const GOOGLE_TEMPLATE_URL: &str = "https://calendar.google.com/calendar/render";
const OUTLOOK_COMPOSE_URL: &str = "https://outlook.live.com/calendar/0/deeplink/compose";
const ICS_PRODUCT_ID: &str = "-//Salon Booking//EN";

/// Longest iCalendar content line, in octets, before folding.
const ICS_LINE_LIMIT: usize = 75;

/// Compact UTC form used by Google Calendar and iCalendar.
const COMPACT_UTC: &str = "%Y%m%dT%H%M%SZ";

/// An appointment to export to a calendar client.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Links returned to the confirmation page.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarLinks {
    pub google: String,
    pub outlook: String,
    pub ics: String,
}

impl CalendarEvent {
    pub fn new(
        title: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
        location: Option<String>,
        description: Option<String>,
    ) -> Result<Self, CoreError> {
        if end <= start {
            return Err(CoreError::InvalidInput(
                "event end must be after its start".to_string(),
            ));
        }
        Ok(Self {
            title: title.into(),
            start,
            end,
            location,
            description,
        })
    }

    fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }

    /// Google Calendar "create event" template URL.
    pub fn google_url(&self) -> String {
        let dates = format!(
            "{}/{}",
            self.start_utc().format(COMPACT_UTC),
            self.end_utc().format(COMPACT_UTC)
        );
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &self.title)
            .append_pair("dates", &dates);
        if let Some(description) = &self.description {
            query.append_pair("details", description);
        }
        if let Some(location) = &self.location {
            query.append_pair("location", location);
        }
        format!("{GOOGLE_TEMPLATE_URL}?{}", query.finish())
    }

    /// Outlook.com compose deeplink.
    pub fn outlook_url(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("path", "/calendar/action/compose")
            .append_pair("rru", "addevent")
            .append_pair("subject", &self.title)
            .append_pair(
                "startdt",
                &self.start_utc().to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair(
                "enddt",
                &self.end_utc().to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        if let Some(description) = &self.description {
            query.append_pair("body", description);
        }
        if let Some(location) = &self.location {
            query.append_pair("location", location);
        }
        format!("{OUTLOOK_COMPOSE_URL}?{}", query.finish())
    }

    /// Single-event iCalendar document (RFC 5545), CRLF line endings, long
    /// lines folded.
    pub fn to_ics(&self, uid: &str, stamp: DateTime<Utc>) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{ICS_PRODUCT_ID}"),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{uid}"),
            format!("DTSTAMP:{}", stamp.format(COMPACT_UTC)),
            format!("DTSTART:{}", self.start_utc().format(COMPACT_UTC)),
            format!("DTEND:{}", self.end_utc().format(COMPACT_UTC)),
            format!("SUMMARY:{}", escape_ics_text(&self.title)),
        ];
        if let Some(description) = &self.description {
            lines.push(format!("DESCRIPTION:{}", escape_ics_text(description)));
        }
        if let Some(location) = &self.location {
            lines.push(format!("LOCATION:{}", escape_ics_text(location)));
        }
        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        let mut doc = lines
            .iter()
            .map(|line| fold_line(line))
            .collect::<Vec<_>>()
            .join("\r\n");
        doc.push_str("\r\n");
        doc
    }

    pub fn links(&self) -> CalendarLinks {
        CalendarLinks {
            google: self.google_url(),
            outlook: self.outlook_url(),
            ics: self.to_ics(&Uuid::new_v4().to_string(), Utc::now()),
        }
    }
}

/// Split a content line into CRLF + space continuations of at most
/// [`ICS_LINE_LIMIT`] octets, never inside a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + line.len() / ICS_LINE_LIMIT * 3);
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > ICS_LINE_LIMIT {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out
}

fn escape_ics_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}
