//! In-memory event store.
//!
//! Backs tests and the offline demo mode with the same contract the
//! HTTP store honors, including NotFound on stale ids.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, Timelike};

use crate::models::event::{Event, EventTime, PRIMARY_CALENDAR_ID};
use crate::models::operation::EventPatch;

use super::{EventSink, EventSource, StoreError};

pub struct MemoryEventStore {
    inner: Mutex<Inner>,
}

struct Inner {
    events: Vec<Event>,
    next_id: u64,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::with_events(Vec::new())
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            inner: Mutex::new(Inner { events, next_id: 1 }),
        }
    }

    /// A small demo dataset around the current week, used when the app
    /// starts without remote credentials.
    pub fn sample_week() -> Self {
        let today_morning = Local::now()
            .with_hour(9)
            .and_then(|t| t.with_minute(0))
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or_else(Local::now);

        let mut events = Vec::new();
        let mut push = |summary: &str,
                        description: Option<&str>,
                        start: DateTime<Local>,
                        minutes: i64| {
            let id = format!("demo-{}", events.len() + 1);
            if let Ok(mut event) =
                Event::timed(id, summary, start, start + Duration::minutes(minutes))
            {
                event.description = description.map(str::to_string);
                events.push(event);
            }
        };

        push("Team standup", None, today_morning, 30);
        push(
            "Algorithms lecture",
            None,
            today_morning + Duration::minutes(90),
            60,
        );
        push(
            "Linear algebra quiz",
            Some("[type: quiz] rows and columns"),
            today_morning + Duration::hours(2),
            45,
        );
        push(
            "Project sync",
            Some("[type: project] sprint review"),
            today_morning + Duration::days(1) + Duration::hours(5),
            60,
        );
        push(
            "Gym",
            None,
            today_morning + Duration::days(2) + Duration::hours(9),
            60,
        );

        Self::with_events(events)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means another test thread panicked;
        // the data itself is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().events.is_empty()
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

fn intersects(event: &Event, range_start: DateTime<Local>, range_end: DateTime<Local>) -> bool {
    match event.time {
        EventTime::Timed { start, end } => start < range_end && end > range_start,
        EventTime::AllDay { start, end } => {
            start <= range_end.date_naive() && end > range_start.date_naive()
        }
    }
}

impl EventSource for MemoryEventStore {
    fn list_events(
        &self,
        range_start: DateTime<Local>,
        range_end: DateTime<Local>,
    ) -> Result<Vec<Event>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .events
            .iter()
            .filter(|event| intersects(event, range_start, range_end))
            .cloned()
            .collect())
    }
}

impl EventSink for MemoryEventStore {
    fn create_event(
        &self,
        summary: &str,
        time: EventTime,
        description: Option<String>,
    ) -> Result<Event, StoreError> {
        let mut inner = self.lock();
        let id = format!("local-{}", inner.next_id);
        inner.next_id += 1;

        let mut event = Event {
            id,
            summary: summary.to_string(),
            description: description.filter(|d| !d.is_empty()),
            calendar_id: PRIMARY_CALENDAR_ID.to_string(),
            time,
        };
        if event.summary.trim().is_empty() {
            event.summary = "(untitled)".to_string();
        }

        inner.events.push(event.clone());
        Ok(event)
    }

    fn update_event(
        &self,
        id: &str,
        calendar_id: &str,
        patch: &EventPatch,
    ) -> Result<Event, StoreError> {
        let mut inner = self.lock();
        let event = inner
            .events
            .iter_mut()
            .find(|event| event.id == id && event.calendar_id == calendar_id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        patch.apply_to(event);
        Ok(event.clone())
    }

    fn delete_event(&self, id: &str, calendar_id: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let before = inner.events.len();
        inner
            .events
            .retain(|event| !(event.id == id && event.calendar_id == calendar_id));

        if inner.events.len() == before {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        Ok(())
    }
}
