// Property-based tests for the engine's pure pieces: snapping and the
// column layout invariants under arbitrary event sets.

use chrono::{Duration, NaiveDate, TimeZone};
use proptest::prelude::*;

use timepane::models::event::Event;
use timepane::services::layout::layout_day;
use timepane::utils::time::{snap, CREATE_SNAP_MINUTES, MINUTES_PER_DAY, RESCHEDULE_SNAP_MINUTES};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn event_at(id: usize, start_minutes: i32, duration_minutes: i32) -> Event {
    let base = chrono::Local
        .with_ymd_and_hms(2025, 3, 10, 0, 0, 0)
        .unwrap();
    Event::timed(
        format!("e{id:03}"),
        format!("Event {id}"),
        base + Duration::minutes(start_minutes as i64),
        base + Duration::minutes((start_minutes + duration_minutes) as i64),
    )
    .unwrap()
}

/// `(start, duration)` pairs that stay inside one day.
fn day_events() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((0..1380i32, 5..240i32), 0..25)
}

proptest! {
    /// Snapping a snapped value is a no-op at both granularities.
    #[test]
    fn prop_snap_is_idempotent(minutes in -2000..4000i32) {
        for granularity in [CREATE_SNAP_MINUTES, RESCHEDULE_SNAP_MINUTES] {
            let once = snap(minutes, granularity);
            prop_assert_eq!(snap(once, granularity), once);
        }
    }

    /// Snapped values are aligned and inside the day.
    #[test]
    fn prop_snap_aligns_and_clamps(minutes in -2000..4000i32) {
        let snapped = snap(minutes, CREATE_SNAP_MINUTES);
        prop_assert_eq!(snapped % CREATE_SNAP_MINUTES, 0);
        prop_assert!((0..=MINUTES_PER_DAY).contains(&snapped));
    }

    /// No two overlapping events may share a column.
    #[test]
    fn prop_overlapping_events_get_distinct_columns(specs in day_events()) {
        let events: Vec<Event> = specs
            .iter()
            .enumerate()
            .map(|(i, (start, duration))| event_at(i, *start, *duration))
            .collect();
        let layouts = layout_day(day(), events.iter().filter_map(|e| e.as_timed()));

        for (i, first) in events.iter().enumerate() {
            for second in events.iter().skip(i + 1) {
                let a = first.as_timed().unwrap();
                let b = second.as_timed().unwrap();
                if a.start < b.end && b.start < a.end {
                    prop_assert_ne!(
                        layouts[&first.id].column,
                        layouts[&second.id].column,
                        "{} and {} overlap but share a column",
                        first.id,
                        second.id
                    );
                }
            }
        }
    }

    /// Every placed event has a sane group: at least one column, its
    /// own index inside the group, and width 1 when nothing overlaps it.
    #[test]
    fn prop_group_sizes_are_consistent(specs in day_events()) {
        let events: Vec<Event> = specs
            .iter()
            .enumerate()
            .map(|(i, (start, duration))| event_at(i, *start, *duration))
            .collect();
        let layouts = layout_day(day(), events.iter().filter_map(|e| e.as_timed()));

        for event in &events {
            let layout = layouts[&event.id];
            prop_assert!(layout.total_columns >= 1);
            prop_assert!(layout.column < layout.total_columns);

            let timed = event.as_timed().unwrap();
            let overlaps_any = events.iter().any(|other| {
                if other.id == event.id {
                    return false;
                }
                let o = other.as_timed().unwrap();
                timed.start < o.end && o.start < timed.end
            });
            if !overlaps_any {
                prop_assert_eq!(layout.total_columns, 1);
            }
        }
    }

    /// The assignment is a pure function of the event set, not its
    /// ordering.
    #[test]
    fn prop_layout_is_order_independent(specs in day_events(), seed in 0..7usize) {
        let mut events: Vec<Event> = specs
            .iter()
            .enumerate()
            .map(|(i, (start, duration))| event_at(i, *start, *duration))
            .collect();
        let reference = layout_day(day(), events.iter().filter_map(|e| e.as_timed()));

        if !events.is_empty() {
            let n = events.len();
            events.rotate_left(seed % n);
        }
        let rotated = layout_day(day(), events.iter().filter_map(|e| e.as_timed()));
        events.reverse();
        let reversed = layout_day(day(), events.iter().filter_map(|e| e.as_timed()));

        prop_assert_eq!(&reference, &rotated);
        prop_assert_eq!(&reference, &reversed);
    }
}
