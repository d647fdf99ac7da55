//! Bounded, typed undo history.
//!
//! Each entry carries exactly what its inverse remote call needs, so
//! undo never consults local caches. The stack is owned by the app
//! session and passed by reference to whatever issues mutations; there
//! is no ambient global history.

use chrono::{DateTime, Local};

use crate::models::event::Event;
use crate::models::operation::EventPatch;
use crate::services::store::EventSink;

/// How far back a user can rewind. Oldest entries fall off first.
pub const MAX_UNDO_ENTRIES: usize = 10;

/// One reversible mutation. The variants mirror the four mutation
/// kinds; each holds the pre-mutation data its inverse needs.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoEntry {
    /// Inverse: delete the created record.
    Create { id: String, calendar_id: String },
    /// Inverse: re-insert the full prior payload.
    Delete { event: Event },
    /// Inverse: patch the overwritten fields back.
    Edit {
        id: String,
        calendar_id: String,
        previous: EventPatch,
    },
    /// Inverse: restore the original window.
    Move {
        id: String,
        calendar_id: String,
        previous_start: DateTime<Local>,
        previous_end: DateTime<Local>,
    },
}

impl UndoEntry {
    /// Human-readable label for the status bar and toasts.
    pub fn description(&self) -> String {
        match self {
            Self::Create { id, .. } => format!("create of event {id}"),
            Self::Delete { event } => format!("delete of \"{}\"", event.summary),
            Self::Edit { id, .. } => format!("edit of event {id}"),
            Self::Move { id, .. } => format!("move of event {id}"),
        }
    }

    /// Issue the single inverse remote call for this entry.
    ///
    /// The entry is consumed either way: undo is a best-effort
    /// convenience, not a durability guarantee, so a failed inverse is
    /// reported as `false` and never re-pushed.
    pub fn revert(self, sink: &dyn EventSink) -> bool {
        let description = self.description();
        let outcome = match self {
            Self::Create { id, calendar_id } => {
                sink.delete_event(&id, &calendar_id).map(|_| ())
            }
            Self::Delete { event } => sink
                .create_event(&event.summary, event.time, event.description)
                .map(|_| ()),
            Self::Edit {
                id,
                calendar_id,
                previous,
            } => sink.update_event(&id, &calendar_id, &previous).map(|_| ()),
            Self::Move {
                id,
                calendar_id,
                previous_start,
                previous_end,
            } => sink
                .update_event(
                    &id,
                    &calendar_id,
                    &EventPatch::reschedule(previous_start, previous_end),
                )
                .map(|_| ()),
        };

        match outcome {
            Ok(()) => true,
            Err(err) => {
                log::error!("Undo of {description} failed: {err}");
                false
            }
        }
    }
}

/// LIFO history of the most recent mutations, capped at
/// [`MAX_UNDO_ENTRIES`].
#[derive(Debug, Default)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, discarding the oldest past the cap.
    pub fn push(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
        while self.entries.len() > MAX_UNDO_ENTRIES {
            self.entries.remove(0);
        }
    }

    /// Remove and return the most recent entry, if any.
    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop()
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label of the entry an undo request would revert next.
    pub fn next_description(&self) -> Option<String> {
        self.entries.last().map(UndoEntry::description)
    }
}

/// Convenience for move entries, the shape the reschedule drag pushes.
pub fn move_entry(
    id: impl Into<String>,
    calendar_id: impl Into<String>,
    previous_start: DateTime<Local>,
    previous_end: DateTime<Local>,
) -> UndoEntry {
    UndoEntry::Move {
        id: id.into(),
        calendar_id: calendar_id.into(),
        previous_start,
        previous_end,
    }
}
