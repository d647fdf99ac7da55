//! Click-drag selection over empty grid space, producing the time range
//! for a new event.

use chrono::{DateTime, Local, NaiveDate};

use crate::utils::time::{day_time, snap, CREATE_SNAP_MINUTES};

/// Shortest span (after snapping) that still counts as a deliberate
/// selection; anything smaller is an accidental click and is discarded.
pub const MIN_CREATE_SPAN_MINUTES: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionState {
    Idle,
    Pressed {
        day: NaiveDate,
        anchor: i32,
        live: i32,
    },
}

/// The create-gesture controller: `Idle → Pressed → Idle`, emitting a
/// [`CreateSelection`] on a qualifying release.
#[derive(Debug, Clone, Copy)]
pub struct DragSelection {
    state: SelectionState,
}

/// A completed selection: `[start_minutes, end_minutes)` on `day`,
/// already snapped to the creation granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateSelection {
    pub day: NaiveDate,
    pub start_minutes: i32,
    pub end_minutes: i32,
}

impl CreateSelection {
    /// Resolve the selection into concrete instants. `None` only when
    /// the local times don't exist (DST gap), which callers treat as a
    /// discarded gesture.
    pub fn resolve(&self) -> Option<(DateTime<Local>, DateTime<Local>)> {
        Some((
            day_time(self.day, self.start_minutes)?,
            day_time(self.day, self.end_minutes)?,
        ))
    }
}

impl DragSelection {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, SelectionState::Idle)
    }

    /// The day the gesture is anchored to, while active.
    pub fn day(&self) -> Option<NaiveDate> {
        match self.state {
            SelectionState::Pressed { day, .. } => Some(day),
            SelectionState::Idle => None,
        }
    }

    /// Pointer-down over empty grid space: anchor the gesture at the
    /// snapped offset under the pointer.
    pub fn press(&mut self, day: NaiveDate, raw_minutes: i32) {
        let anchor = snap(raw_minutes, CREATE_SNAP_MINUTES);
        self.state = SelectionState::Pressed {
            day,
            anchor,
            live: anchor,
        };
    }

    /// Pointer movement while pressed: update the live edge.
    pub fn drag_to(&mut self, raw_minutes: i32) {
        if let SelectionState::Pressed { live, .. } = &mut self.state {
            *live = snap(raw_minutes, CREATE_SNAP_MINUTES);
        }
    }

    /// The preview rectangle's span, `[min(anchor, live), max(anchor, live))`.
    pub fn preview(&self) -> Option<(NaiveDate, i32, i32)> {
        match self.state {
            SelectionState::Pressed { day, anchor, live } => {
                Some((day, anchor.min(live), anchor.max(live)))
            }
            SelectionState::Idle => None,
        }
    }

    /// Pointer-up: emit the selection if the snapped span qualifies,
    /// discard silently otherwise. Either way the gesture ends.
    pub fn release(&mut self) -> Option<CreateSelection> {
        let result = match self.state {
            SelectionState::Pressed { day, anchor, live } => {
                let start = anchor.min(live);
                let end = anchor.max(live);
                (end - start >= MIN_CREATE_SPAN_MINUTES).then_some(CreateSelection {
                    day,
                    start_minutes: start,
                    end_minutes: end,
                })
            }
            SelectionState::Idle => None,
        };
        self.state = SelectionState::Idle;
        result
    }

    /// Pointer left the grid without a release. Treated exactly like a
    /// release at the last known live offset, so a gesture can never
    /// get stuck when the pointer exits the window.
    pub fn pointer_left(&mut self) -> Option<CreateSelection> {
        self.release()
    }
}

impl Default for DragSelection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn short_raw_gesture_qualifies_after_snapping() {
        // Anchor 10:07 → 10:00, release 10:19 → 10:15: the raw gesture
        // is only 12 minutes but the snapped span is a full 15.
        let mut gesture = DragSelection::new();
        gesture.press(day(), 607);
        gesture.drag_to(619);

        let selection = gesture.release().expect("snapped span is 15 minutes");
        assert_eq!(selection.start_minutes, 600);
        assert_eq!(selection.end_minutes, 615);
        assert!(!gesture.is_active());
    }

    #[test]
    fn sub_threshold_release_is_discarded_silently() {
        let mut gesture = DragSelection::new();
        gesture.press(day(), 600);
        gesture.drag_to(604); // snaps back onto the anchor

        assert!(gesture.release().is_none());
        assert!(!gesture.is_active());
    }

    #[test]
    fn upward_drag_swaps_anchor_and_live() {
        let mut gesture = DragSelection::new();
        gesture.press(day(), 660);
        gesture.drag_to(600);

        let (preview_day, start, end) = gesture.preview().unwrap();
        assert_eq!(preview_day, day());
        assert_eq!((start, end), (600, 660));

        let selection = gesture.release().unwrap();
        assert_eq!((selection.start_minutes, selection.end_minutes), (600, 660));
    }

    #[test]
    fn pointer_leave_acts_as_release() {
        let mut gesture = DragSelection::new();
        gesture.press(day(), 540);
        gesture.drag_to(600);

        let selection = gesture.pointer_left().expect("qualifying span");
        assert_eq!((selection.start_minutes, selection.end_minutes), (540, 600));
        assert!(!gesture.is_active());
    }

    #[test]
    fn release_when_idle_is_a_no_op() {
        let mut gesture = DragSelection::new();
        assert!(gesture.release().is_none());
        assert!(gesture.preview().is_none());
    }

    #[test]
    fn drag_to_ignored_when_idle() {
        let mut gesture = DragSelection::new();
        gesture.drag_to(700);
        assert!(!gesture.is_active());
    }

    #[test]
    fn selection_resolves_to_instants_on_anchor_day() {
        let mut gesture = DragSelection::new();
        gesture.press(day(), 540);
        gesture.drag_to(630);
        let selection = gesture.release().unwrap();

        let (start, end) = selection.resolve().unwrap();
        assert_eq!(start.date_naive(), day());
        assert_eq!((end - start).num_minutes(), 90);
    }
}
