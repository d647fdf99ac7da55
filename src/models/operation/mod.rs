// Structured event mutations
// The single currency shared by drag gestures, dialogs and the
// natural-language command surface

use chrono::{DateTime, Local};

use super::event::{Event, EventTime};

/// Partial update for an existing event. `None` means "leave the field
/// alone"; an empty string in `description` means "clear it".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub time: Option<EventTime>,
}

impl EventPatch {
    /// Patch that only moves the event window, the shape a reschedule
    /// drag and its undo both produce.
    pub fn reschedule(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self {
            time: Some(EventTime::Timed { start, end }),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.description.is_none() && self.time.is_none()
    }

    /// Snapshot of the fields this patch is about to overwrite, taken
    /// from the current `event`. Applying the snapshot as a patch
    /// restores the pre-mutation values.
    pub fn inverse_from(&self, event: &Event) -> EventPatch {
        EventPatch {
            summary: self.summary.as_ref().map(|_| event.summary.clone()),
            description: self
                .description
                .as_ref()
                .map(|_| event.description.clone().unwrap_or_default()),
            time: self.time.as_ref().map(|_| event.time.clone()),
        }
    }

    /// Fold this patch into `event` in place. Used by the in-memory
    /// store; the HTTP store sends the patch over the wire instead.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(summary) = &self.summary {
            event.summary = summary.clone();
        }
        if let Some(description) = &self.description {
            event.description = if description.is_empty() {
                None
            } else {
                Some(description.clone())
            };
        }
        if let Some(time) = &self.time {
            event.time = time.clone();
        }
    }
}

/// A mutation against the remote store, carrying exactly what the sink
/// call needs.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOperation {
    Create {
        summary: String,
        time: EventTime,
        description: Option<String>,
    },
    Edit {
        id: String,
        calendar_id: String,
        patch: EventPatch,
    },
    Move {
        id: String,
        calendar_id: String,
        new_start: DateTime<Local>,
        new_end: DateTime<Local>,
    },
    Delete {
        id: String,
        calendar_id: String,
    },
}

impl EventOperation {
    /// Short human-readable label for toasts and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Create { summary, .. } => format!("Create \"{summary}\""),
            Self::Edit { id, .. } => format!("Edit event {id}"),
            Self::Move { id, .. } => format!("Move event {id}"),
            Self::Delete { id, .. } => format!("Delete event {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    fn sample_event() -> Event {
        let mut event = Event::timed("e1", "Old title", stamp(9), stamp(10)).unwrap();
        event.description = Some("old notes".to_string());
        event
    }

    #[test]
    fn inverse_snapshots_only_touched_fields() {
        let patch = EventPatch {
            summary: Some("New title".to_string()),
            ..EventPatch::default()
        };
        let inverse = patch.inverse_from(&sample_event());

        assert_eq!(inverse.summary.as_deref(), Some("Old title"));
        assert!(inverse.description.is_none());
        assert!(inverse.time.is_none());
    }

    #[test]
    fn inverse_then_apply_restores_event() {
        let mut event = sample_event();
        let original = event.clone();

        let patch = EventPatch {
            summary: Some("Renamed".to_string()),
            description: Some(String::new()),
            time: Some(EventTime::Timed {
                start: stamp(11),
                end: stamp(12),
            }),
        };
        let inverse = patch.inverse_from(&event);

        patch.apply_to(&mut event);
        assert_eq!(event.summary, "Renamed");
        assert!(event.description.is_none());

        inverse.apply_to(&mut event);
        assert_eq!(event, original);
    }

    #[test]
    fn empty_description_clears_field() {
        let mut event = sample_event();
        let patch = EventPatch {
            description: Some(String::new()),
            ..EventPatch::default()
        };
        patch.apply_to(&mut event);
        assert!(event.description.is_none());
    }

    #[test]
    fn reschedule_patch_only_carries_time() {
        let patch = EventPatch::reschedule(stamp(14), stamp(15));
        assert!(patch.summary.is_none());
        assert!(patch.description.is_none());
        assert!(!patch.is_empty());
    }
}
