// Event module
// Calendar event model shared by the layout engine, the views and the stores

use chrono::{DateTime, Duration, Local, NaiveDate};

/// Calendar collection new events land in when none is specified.
pub const PRIMARY_CALENDAR_ID: &str = "primary";

/// When an event occupies the grid: either a precise `[start, end)`
/// window or one-or-more whole days (`end` exclusive, provider style).
///
/// The split is a tagged union on purpose: only `Timed` events enter the
/// column layout engine, and the type system enforces that instead of a
/// runtime field-presence check.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    Timed {
        start: DateTime<Local>,
        end: DateTime<Local>,
    },
    AllDay {
        start: NaiveDate,
        /// Exclusive: a one-day event has `end == start + 1 day`.
        end: NaiveDate,
    },
}

/// A calendar event as fetched from (or destined for) the remote store.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Opaque identity, stable per remote record.
    pub id: String,
    pub summary: String,
    /// Free text; may embed a structured `[type: <word>]` tag.
    pub description: Option<String>,
    /// Origin collection.
    pub calendar_id: String,
    pub time: EventTime,
}

/// Borrowed view of a timed event, the only shape the layout engine and
/// the reschedule gesture accept.
#[derive(Debug, Clone, Copy)]
pub struct TimedEvent<'a> {
    pub id: &'a str,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl Event {
    /// Create a timed event with required fields.
    ///
    /// Local creation paths (dialogs, drag-to-create) come through here,
    /// so a non-positive duration is rejected up front. Remote records
    /// are deserialized directly and may carry provider quirks the
    /// layout engine tolerates instead.
    pub fn timed(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Self, String> {
        let summary = summary.into();
        if summary.trim().is_empty() {
            return Err("Event summary cannot be empty".to_string());
        }
        if end <= start {
            return Err("Event end time must be after start time".to_string());
        }

        Ok(Self {
            id: id.into(),
            summary,
            description: None,
            calendar_id: PRIMARY_CALENDAR_ID.to_string(),
            time: EventTime::Timed { start, end },
        })
    }

    /// Create a whole-day event spanning `[start, end)` dates.
    pub fn all_day(
        id: impl Into<String>,
        summary: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, String> {
        let summary = summary.into();
        if summary.trim().is_empty() {
            return Err("Event summary cannot be empty".to_string());
        }
        if end <= start {
            return Err("All-day end date must be after the start date".to_string());
        }

        Ok(Self {
            id: id.into(),
            summary,
            description: None,
            calendar_id: PRIMARY_CALENDAR_ID.to_string(),
            time: EventTime::AllDay { start, end },
        })
    }

    /// Create a builder for constructing events with optional fields.
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self.time, EventTime::AllDay { .. })
    }

    /// Timed view of this event, or `None` for whole-day events.
    pub fn as_timed(&self) -> Option<TimedEvent<'_>> {
        match self.time {
            EventTime::Timed { start, end } => Some(TimedEvent {
                id: &self.id,
                start,
                end,
            }),
            EventTime::AllDay { .. } => None,
        }
    }

    /// The day this event is anchored to in the grid: its start day.
    pub fn anchor_date(&self) -> NaiveDate {
        match self.time {
            EventTime::Timed { start, .. } => start.date_naive(),
            EventTime::AllDay { start, .. } => start,
        }
    }

    /// Whether the event should appear on `day` at all. Timed events
    /// belong to their start day (midnight-crossers are clamped there);
    /// whole-day events span their `[start, end)` date range.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        match self.time {
            EventTime::Timed { start, .. } => start.date_naive() == day,
            EventTime::AllDay { start, end } => start <= day && day < end,
        }
    }

    /// Duration of the event; whole-day events count calendar days.
    pub fn duration(&self) -> Duration {
        match self.time {
            EventTime::Timed { start, end } => end - start,
            EventTime::AllDay { start, end } => Duration::days((end - start).num_days()),
        }
    }
}

/// Builder for creating events with optional fields.
pub struct EventBuilder {
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    calendar_id: Option<String>,
    time: Option<EventTime>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            summary: None,
            description: None,
            calendar_id: None,
            time: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = Some(calendar_id.into());
        self
    }

    pub fn timed(mut self, start: DateTime<Local>, end: DateTime<Local>) -> Self {
        self.time = Some(EventTime::Timed { start, end });
        self
    }

    pub fn all_day(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.time = Some(EventTime::AllDay { start, end });
        self
    }

    pub fn build(self) -> Result<Event, String> {
        let summary = self.summary.ok_or("Event summary is required")?;
        let time = self.time.ok_or("Event time is required")?;

        let mut event = match time {
            EventTime::Timed { start, end } => {
                Event::timed(self.id.unwrap_or_default(), summary, start, end)?
            }
            EventTime::AllDay { start, end } => {
                Event::all_day(self.id.unwrap_or_default(), summary, start, end)?
            }
        };
        event.description = self.description.filter(|d| !d.is_empty());
        if let Some(calendar_id) = self.calendar_id {
            event.calendar_id = calendar_id;
        }
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
