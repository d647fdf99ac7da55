//! HTTP-backed event store.
//!
//! A thin request/response wrapper over a Google-Calendar-shaped REST
//! surface. Auth is external: the caller hands over an already-valid
//! bearer token. Mutations are never retried; a failure surfaces as a
//! message and the next refresh reconciles local state.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::models::event::{Event, EventTime, PRIMARY_CALENDAR_ID};
use crate::models::operation::EventPatch;

use super::{EventSink, EventSource, StoreError};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
/// Guard against a misbehaving endpoint streaming an unbounded body.
const MAX_RESPONSE_BYTES: usize = 5 * 1024 * 1024;

pub struct HttpEventStore {
    client: Client,
    base_url: String,
    token: String,
    calendar_id: String,
}

impl HttpEventStore {
    pub fn new(token: impl Into<String>) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            calendar_id: PRIMARY_CALENDAR_ID.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!("{}/calendars/{}/events", self.base_url, calendar_id)
    }

    fn read_body(response: Response) -> Result<Vec<u8>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes()?;
        if bytes.len() > MAX_RESPONSE_BYTES {
            return Err(StoreError::Decode(format!(
                "response too large ({} bytes)",
                bytes.len()
            )));
        }
        Ok(bytes.to_vec())
    }

    fn decode_event(bytes: &[u8], calendar_id: &str) -> Result<Event, StoreError> {
        let wire: WireEvent =
            serde_json::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))?;
        event_from_wire(wire, calendar_id).map_err(StoreError::Decode)
    }
}

impl EventSource for HttpEventStore {
    fn list_events(
        &self,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> Result<Vec<Event>, StoreError> {
        let response = self
            .client
            .get(self.events_url(&self.calendar_id))
            .bearer_auth(&self.token)
            .query(&[
                ("timeMin", range_start.to_rfc3339()),
                ("timeMax", range_end.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()?;

        let bytes = Self::read_body(response)?;
        let list: WireEventList =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))?;

        // Records the wire layer cannot make sense of are skipped, not
        // fatal: one malformed item must not blank the whole calendar.
        let mut events = Vec::with_capacity(list.items.len());
        for wire in list.items {
            match event_from_wire(wire, &self.calendar_id) {
                Ok(event) => events.push(event),
                Err(reason) => log::warn!("Skipping malformed remote event: {reason}"),
            }
        }
        Ok(events)
    }
}

impl EventSink for HttpEventStore {
    fn create_event(
        &self,
        summary: &str,
        time: EventTime,
        description: Option<String>,
    ) -> Result<Event, StoreError> {
        let (start, end) = wire_stamps(&time);
        let body = WireEvent {
            id: None,
            summary: Some(summary.to_string()),
            description,
            start,
            end,
        };

        let response = self
            .client
            .post(self.events_url(&self.calendar_id))
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;

        let bytes = Self::read_body(response)?;
        Self::decode_event(&bytes, &self.calendar_id)
    }

    fn update_event(
        &self,
        id: &str,
        calendar_id: &str,
        patch: &EventPatch,
    ) -> Result<Event, StoreError> {
        let response = self
            .client
            .patch(format!("{}/{}", self.events_url(calendar_id), id))
            .bearer_auth(&self.token)
            .json(&wire_patch(patch))
            .send()?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        let bytes = Self::read_body(response)?;
        Self::decode_event(&bytes, calendar_id)
    }

    fn delete_event(&self, id: &str, calendar_id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(format!("{}/{}", self.events_url(calendar_id), id))
            .bearer_auth(&self.token)
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

// ── Wire shapes ────────────────────────────────────────────────────

/// One endpoint of an event window on the wire: exactly one of `date`
/// (whole-day) or `dateTime` (timed) is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireStamp {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    date_time: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start: WireStamp,
    end: WireStamp,
}

#[derive(Debug, Deserialize)]
struct WireEventList {
    #[serde(default)]
    items: Vec<WireEvent>,
}

fn wire_stamps(time: &EventTime) -> (WireStamp, WireStamp) {
    match time {
        EventTime::Timed { start, end } => (
            WireStamp {
                date_time: Some(start.fixed_offset()),
                date: None,
            },
            WireStamp {
                date_time: Some(end.fixed_offset()),
                date: None,
            },
        ),
        EventTime::AllDay { start, end } => (
            WireStamp {
                date_time: None,
                date: Some(*start),
            },
            WireStamp {
                date_time: None,
                date: Some(*end),
            },
        ),
    }
}

fn event_from_wire(wire: WireEvent, calendar_id: &str) -> Result<Event, String> {
    let id = wire.id.ok_or("event without id")?;
    let time = match (
        wire.start.date_time,
        wire.start.date,
        wire.end.date_time,
        wire.end.date,
    ) {
        (Some(start), _, Some(end), _) => EventTime::Timed {
            start: start.with_timezone(&Local),
            end: end.with_timezone(&Local),
        },
        (None, Some(start), None, Some(end)) => EventTime::AllDay { start, end },
        _ => return Err(format!("event {id} mixes timed and whole-day endpoints")),
    };

    Ok(Event {
        id,
        summary: wire.summary.unwrap_or_else(|| "(untitled)".to_string()),
        description: wire.description.filter(|d| !d.is_empty()),
        calendar_id: calendar_id.to_string(),
        time,
    })
}

fn wire_patch(patch: &EventPatch) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    if let Some(summary) = &patch.summary {
        body.insert("summary".to_string(), serde_json::json!(summary));
    }
    if let Some(description) = &patch.description {
        // Empty string clears the field; the provider expects null.
        let value = if description.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::json!(description)
        };
        body.insert("description".to_string(), value);
    }
    if let Some(time) = &patch.time {
        let (start, end) = wire_stamps(time);
        if let (Ok(start), Ok(end)) = (
            serde_json::to_value(start),
            serde_json::to_value(end),
        ) {
            body.insert("start".to_string(), start);
            body.insert("end".to_string(), end);
        }
    }
    serde_json::Value::Object(body)
}
