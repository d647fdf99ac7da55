//! Drag-and-drop rescheduling of an existing timed event.
//!
//! The gesture captures the event's original window once at drag start;
//! duration is held fixed for the rest of the gesture, so a drop only
//! ever changes where the window begins.

use chrono::{DateTime, Duration, Local, NaiveDate};

use crate::models::event::Event;
use crate::utils::time::{day_time, snap, RESCHEDULE_SNAP_MINUTES};

/// The grid cell currently under the pointer during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    pub day: NaiveDate,
    /// Snapped to the reschedule granularity.
    pub minutes: i32,
}

#[derive(Debug, Clone)]
enum RescheduleState {
    Idle,
    Dragging {
        event_id: String,
        calendar_id: String,
        original_start: DateTime<Local>,
        original_end: DateTime<Local>,
        duration: Duration,
        target: Option<DropTarget>,
    },
}

/// The reschedule-gesture controller: `Idle → Dragging → Idle`.
#[derive(Debug, Clone)]
pub struct DragReschedule {
    state: RescheduleState,
}

/// A completed drop: everything the mutation path needs, including the
/// original window for the undo entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRequest {
    pub event_id: String,
    pub calendar_id: String,
    pub original_start: DateTime<Local>,
    pub original_end: DateTime<Local>,
    pub new_start: DateTime<Local>,
    pub new_end: DateTime<Local>,
}

impl DragReschedule {
    pub fn new() -> Self {
        Self {
            state: RescheduleState::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, RescheduleState::Idle)
    }

    /// Id of the event being dragged, while active. Views use this to
    /// render the original at reduced opacity.
    pub fn dragged_event_id(&self) -> Option<&str> {
        match &self.state {
            RescheduleState::Dragging { event_id, .. } => Some(event_id),
            RescheduleState::Idle => None,
        }
    }

    /// Begin dragging `event`. Whole-day events cannot be rescheduled
    /// by this gesture; the call is ignored and reports `false`.
    pub fn begin(&mut self, event: &Event) -> bool {
        let Some(timed) = event.as_timed() else {
            return false;
        };
        self.state = RescheduleState::Dragging {
            event_id: event.id.clone(),
            calendar_id: event.calendar_id.clone(),
            original_start: timed.start,
            original_end: timed.end,
            duration: timed.end - timed.start,
            target: None,
        };
        true
    }

    /// Pointer moved over a grid cell: update the drop target. No
    /// remote call happens until the drop.
    pub fn drag_over(&mut self, day: NaiveDate, raw_minutes: i32) {
        if let RescheduleState::Dragging { target, .. } = &mut self.state {
            *target = Some(DropTarget {
                day,
                minutes: snap(raw_minutes, RESCHEDULE_SNAP_MINUTES),
            });
        }
    }

    /// Current drop target, for the dashed preview.
    pub fn target(&self) -> Option<DropTarget> {
        match &self.state {
            RescheduleState::Dragging { target, .. } => *target,
            RescheduleState::Idle => None,
        }
    }

    /// Preview span at the prospective drop position, in minutes on the
    /// target day.
    pub fn preview(&self) -> Option<(NaiveDate, i32, i32)> {
        match &self.state {
            RescheduleState::Dragging {
                duration,
                target: Some(target),
                ..
            } => Some((
                target.day,
                target.minutes,
                target.minutes + duration.num_minutes() as i32,
            )),
            _ => None,
        }
    }

    /// Drop on the current target. Returns the move request, or `None`
    /// when there is no valid target (drag ended outside the grid, or
    /// the target resolves to a nonexistent local time) — in which case
    /// nothing is mutated and no undo entry should be pushed.
    pub fn drop(&mut self) -> Option<MoveRequest> {
        let state = std::mem::replace(&mut self.state, RescheduleState::Idle);
        let RescheduleState::Dragging {
            event_id,
            calendar_id,
            original_start,
            original_end,
            duration,
            target: Some(target),
        } = state
        else {
            return None;
        };

        let new_start = day_time(target.day, target.minutes)?;
        let new_end = new_start + duration;
        Some(MoveRequest {
            event_id,
            calendar_id,
            original_start,
            original_end,
            new_start,
            new_end,
        })
    }

    /// Abandon the gesture with no side effect.
    pub fn cancel(&mut self) {
        self.state = RescheduleState::Idle;
    }
}

impl Default for DragReschedule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn stamp(hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 3, 10, hour, minute, 0)
            .unwrap()
    }

    fn hour_event() -> Event {
        Event::timed("e1", "Focus block", stamp(14, 0), stamp(15, 0)).unwrap()
    }

    #[test]
    fn drop_preserves_duration_exactly() {
        // 60-minute event dragged from 14:00 to 15:05 (already aligned
        // to the 5-minute grid) must land at 15:05-16:05.
        let mut gesture = DragReschedule::new();
        assert!(gesture.begin(&hour_event()));
        gesture.drag_over(day(), 905);

        let request = gesture.drop().expect("valid drop target");
        assert_eq!(request.new_start, stamp(15, 5));
        assert_eq!(request.new_end, stamp(16, 5));
        assert_eq!(request.original_start, stamp(14, 0));
        assert_eq!(request.original_end, stamp(15, 0));
        assert!(!gesture.is_active());
    }

    #[test]
    fn drag_over_snaps_to_five_minutes() {
        let mut gesture = DragReschedule::new();
        gesture.begin(&hour_event());
        gesture.drag_over(day(), 907);

        assert_eq!(
            gesture.target(),
            Some(DropTarget {
                day: day(),
                minutes: 905
            })
        );
    }

    #[test]
    fn drop_without_target_is_discarded() {
        let mut gesture = DragReschedule::new();
        gesture.begin(&hour_event());

        assert!(gesture.drop().is_none());
        assert!(!gesture.is_active());
    }

    #[test]
    fn drop_on_another_day_keeps_time_of_day_math() {
        let mut gesture = DragReschedule::new();
        gesture.begin(&hour_event());
        let tomorrow = day() + Duration::days(1);
        gesture.drag_over(tomorrow, 540);

        let request = gesture.drop().unwrap();
        assert_eq!(request.new_start.date_naive(), tomorrow);
        assert_eq!((request.new_end - request.new_start).num_minutes(), 60);
    }

    #[test]
    fn all_day_events_are_refused() {
        let holiday = Event::all_day("h1", "Holiday", day(), day() + Duration::days(1)).unwrap();
        let mut gesture = DragReschedule::new();

        assert!(!gesture.begin(&holiday));
        assert!(!gesture.is_active());
    }

    #[test]
    fn cancel_discards_everything() {
        let mut gesture = DragReschedule::new();
        gesture.begin(&hour_event());
        gesture.drag_over(day(), 905);
        gesture.cancel();

        assert!(!gesture.is_active());
        assert!(gesture.drop().is_none());
    }

    #[test]
    fn preview_tracks_target_and_duration() {
        let mut gesture = DragReschedule::new();
        gesture.begin(&hour_event());
        assert!(gesture.preview().is_none());

        gesture.drag_over(day(), 600);
        assert_eq!(gesture.preview(), Some((day(), 600, 660)));
    }
}
