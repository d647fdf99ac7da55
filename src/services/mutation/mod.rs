//! Mutation dispatch.
//!
//! Every mutation — drag intents, dialog saves, natural-language
//! operations — funnels through here so the undo entry, the sink call
//! and the user-facing message stay consistent across producers.
//!
//! The two halves are split deliberately: the UI thread pushes the undo
//! entry with [`undo_entry_for`] at the moment the intent is issued,
//! then hands [`execute`] to a worker thread for the remote call.

use crate::models::event::Event;
use crate::models::operation::EventOperation;
use crate::services::store::{EventSink, StoreError};
use crate::services::undo::{UndoEntry, UndoStack};

/// Outcome of a successful mutation.
#[derive(Debug, Clone)]
pub struct Applied {
    /// One-line confirmation for the toast layer.
    pub message: String,
    /// The record returned by a create, so the caller can push the
    /// matching undo entry once the id exists.
    pub created: Option<Event>,
}

/// The undo entry a mutation should push before its remote call.
///
/// `None` for creates (the id only exists after the sink responds) and
/// for operations whose target is not in the current event list — with
/// nothing to capture, the mutation proceeds without a rewind point.
pub fn undo_entry_for(op: &EventOperation, current: &[Event]) -> Option<UndoEntry> {
    match op {
        EventOperation::Create { .. } => None,
        EventOperation::Edit { id, patch, .. } => {
            let event = find_event(current, id)?;
            Some(UndoEntry::Edit {
                id: event.id.clone(),
                calendar_id: event.calendar_id.clone(),
                previous: patch.inverse_from(event),
            })
        }
        EventOperation::Move { id, .. } => {
            let event = find_event(current, id)?;
            let timed = event.as_timed()?;
            Some(UndoEntry::Move {
                id: event.id.clone(),
                calendar_id: event.calendar_id.clone(),
                previous_start: timed.start,
                previous_end: timed.end,
            })
        }
        EventOperation::Delete { id, .. } => {
            let event = find_event(current, id)?;
            Some(UndoEntry::Delete {
                event: event.clone(),
            })
        }
    }
}

/// Issue the remote call for `op`. Safe to run off the UI thread; no
/// shared state is touched.
pub fn execute(op: &EventOperation, sink: &dyn EventSink) -> Result<Applied, StoreError> {
    match op {
        EventOperation::Create {
            summary,
            time,
            description,
        } => {
            let event = sink.create_event(summary, time.clone(), description.clone())?;
            Ok(Applied {
                message: format!("Created \"{}\"", event.summary),
                created: Some(event),
            })
        }
        EventOperation::Edit {
            id,
            calendar_id,
            patch,
        } => {
            let event = sink.update_event(id, calendar_id, patch)?;
            Ok(Applied {
                message: format!("Updated \"{}\"", event.summary),
                created: None,
            })
        }
        EventOperation::Move {
            id,
            calendar_id,
            new_start,
            new_end,
        } => {
            let patch = crate::models::operation::EventPatch::reschedule(*new_start, *new_end);
            let event = sink.update_event(id, calendar_id, &patch)?;
            Ok(Applied {
                message: format!("Moved \"{}\"", event.summary),
                created: None,
            })
        }
        EventOperation::Delete { id, calendar_id } => {
            sink.delete_event(id, calendar_id)?;
            Ok(Applied {
                message: "Event deleted".to_string(),
                created: None,
            })
        }
    }
}

/// Synchronous convenience path: push the undo entry, issue the call,
/// and for creates push the `Create` entry once the id is known.
///
/// The entry stays pushed even when the remote call then fails — the
/// stack mirrors what was *attempted*, and the next refresh restores
/// truth either way.
pub fn apply_operation(
    op: &EventOperation,
    current: &[Event],
    sink: &dyn EventSink,
    undo: &mut UndoStack,
) -> Result<Applied, StoreError> {
    if let Some(entry) = undo_entry_for(op, current) {
        undo.push(entry);
    }

    let applied = execute(op, sink)?;
    if let Some(created) = &applied.created {
        undo.push(UndoEntry::Create {
            id: created.id.clone(),
            calendar_id: created.calendar_id.clone(),
        });
    }
    Ok(applied)
}

fn find_event<'a>(current: &'a [Event], id: &str) -> Option<&'a Event> {
    current.iter().find(|event| event.id == id)
}
