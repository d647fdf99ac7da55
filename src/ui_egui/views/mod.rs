//! Calendar views: day and week time grids plus the all-day ribbon.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::event::Event;
use crate::services::gesture::{CreateSelection, MoveRequest};

pub mod day_view;
pub mod ribbon;
pub mod time_grid;
pub mod week_view;

/// What the user did to the grid this frame. At most one field is set
/// per gesture; merges keep the first non-empty value.
#[derive(Default)]
pub struct GridOutcome {
    /// A qualifying drag-to-create selection was released.
    pub create: Option<CreateSelection>,
    /// A reschedule drag was dropped on a valid target.
    pub move_request: Option<MoveRequest>,
    /// An event was double-clicked or "Edit" chosen from its menu.
    pub edit_event: Option<Event>,
    /// "Delete" chosen from an event's context menu.
    pub delete_event: Option<Event>,
    /// Empty grid space was double-clicked: (day, snapped minutes).
    pub open_create_dialog: Option<(NaiveDate, i32)>,
}

impl GridOutcome {
    pub fn merge(&mut self, other: GridOutcome) {
        if self.create.is_none() {
            self.create = other.create;
        }
        if self.move_request.is_none() {
            self.move_request = other.move_request;
        }
        if self.edit_event.is_none() {
            self.edit_event = other.edit_event;
        }
        if self.delete_event.is_none() {
            self.delete_event = other.delete_event;
        }
        if self.open_create_dialog.is_none() {
            self.open_create_dialog = other.open_create_dialog;
        }
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(offset)
}

/// The seven days of the week containing `date`.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(date);
    (0..7).map(|i| start + Duration::days(i)).collect()
}
