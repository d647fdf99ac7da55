//! Column layout for overlapping timed events.
//!
//! Packs one day's events into side-by-side columns with a greedy
//! first-fit pass, then narrows each event's width to its own overlap
//! group so isolated events keep full width even on busy days.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::models::event::TimedEvent;
use crate::utils::time::{offset_minutes, MINUTES_PER_DAY};

/// Visual floor for short events in multi-day (week) columns, minutes.
pub const WEEK_MIN_EVENT_MINUTES: i32 = 20;
/// Visual floor for short events in the single-day view, minutes.
pub const DAY_MIN_EVENT_MINUTES: i32 = 30;

/// Where an event renders horizontally: 0-based `column` within its
/// overlap group of `total_columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub column: usize,
    pub total_columns: usize,
}

/// An event projected onto one day's minute axis.
#[derive(Debug, Clone)]
struct Span {
    id: String,
    start: i32,
    end: i32,
    grid_column: usize,
}

impl Span {
    fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Compute column assignments for the timed events of `day`.
///
/// Deterministic across re-renders and input orderings: events are
/// sorted by start minute with event id as the tie-break before
/// placement. Zero-duration events are dropped; an event whose end
/// precedes its start in minute space is treated as crossing midnight
/// and clamped to the bottom of the day.
pub fn layout_day<'a, I>(day: NaiveDate, events: I) -> HashMap<String, ColumnLayout>
where
    I: IntoIterator<Item = TimedEvent<'a>>,
{
    let mut spans: Vec<Span> = events
        .into_iter()
        .filter_map(|event| day_span(day, event))
        .collect();
    if spans.is_empty() {
        return HashMap::new();
    }

    spans.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

    // Greedy first-fit: scan columns left to right and reuse the first
    // whose last occupant has ended by the time this event starts.
    let mut column_ends: Vec<i32> = Vec::new();
    for span in &mut spans {
        match column_ends.iter().position(|&end| end <= span.start) {
            Some(column) => {
                column_ends[column] = span.end;
                span.grid_column = column;
            }
            None => {
                span.grid_column = column_ends.len();
                column_ends.push(span.end);
            }
        }
    }

    // Re-index per overlap group: count only the distinct grid columns
    // occupied by events this one actually overlaps (itself included),
    // and renumber the event's column within that set.
    let mut layouts = HashMap::with_capacity(spans.len());
    for (index, span) in spans.iter().enumerate() {
        let mut group: BTreeSet<usize> = BTreeSet::new();
        group.insert(span.grid_column);
        for (other_index, other) in spans.iter().enumerate() {
            if other_index != index && span.overlaps(other) {
                group.insert(other.grid_column);
            }
        }
        let column = group
            .iter()
            .position(|&c| c == span.grid_column)
            .unwrap_or(0);
        layouts.insert(
            span.id.clone(),
            ColumnLayout {
                column,
                total_columns: group.len(),
            },
        );
    }

    layouts
}

/// Extend short spans to a readable height. The floor affects rendering
/// only; overlap computation always uses the true end time.
pub fn visual_end_minutes(start: i32, end: i32, min_minutes: i32) -> i32 {
    end.max(start + min_minutes).min(MINUTES_PER_DAY)
}

fn day_span(day: NaiveDate, event: TimedEvent<'_>) -> Option<Span> {
    if event.end == event.start {
        return None;
    }

    let start = offset_minutes(event.start, day);
    if start >= MINUTES_PER_DAY {
        return None;
    }

    // An end at-or-before the start in minute space means the record
    // crosses midnight; it occupies the rest of the day here and the
    // remote record is left untouched.
    let mut end = offset_minutes(event.end, day);
    if end <= start {
        end = MINUTES_PER_DAY;
    }

    Some(Span {
        id: event.id.to_string(),
        start,
        end,
        grid_column: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Event;
    use chrono::{DateTime, Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn stamp(hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 3, 10, hour, minute, 0)
            .unwrap()
    }

    fn timed(id: &str, start: (u32, u32), end: (u32, u32)) -> Event {
        Event::timed(id, id, stamp(start.0, start.1), stamp(end.0, end.1)).unwrap()
    }

    fn layout_of(events: &[Event]) -> HashMap<String, ColumnLayout> {
        layout_day(day(), events.iter().filter_map(|e| e.as_timed()))
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(layout_of(&[]).is_empty());
    }

    #[test]
    fn isolated_event_gets_full_width() {
        let events = vec![timed("a", (9, 0), (10, 0))];
        let layouts = layout_of(&events);
        assert_eq!(
            layouts["a"],
            ColumnLayout {
                column: 0,
                total_columns: 1
            }
        );
    }

    #[test]
    fn chain_of_three_shares_two_columns() {
        // A 09:00-10:00, B 09:30-10:30, C 10:00-11:00: A/B overlap and
        // B/C overlap, but A/C do not, so A and C share a column while
        // B takes the other. Every event sits in a 2-wide group.
        let events = vec![
            timed("a", (9, 0), (10, 0)),
            timed("b", (9, 30), (10, 30)),
            timed("c", (10, 0), (11, 0)),
        ];
        let layouts = layout_of(&events);

        assert_eq!(
            layouts["a"],
            ColumnLayout {
                column: 0,
                total_columns: 2
            }
        );
        assert_eq!(
            layouts["b"],
            ColumnLayout {
                column: 1,
                total_columns: 2
            }
        );
        assert_eq!(
            layouts["c"],
            ColumnLayout {
                column: 0,
                total_columns: 2
            }
        );
    }

    #[test]
    fn overlap_group_is_local_not_global() {
        // Three parallel morning events force a 3-wide grid, but a pair
        // of afternoon events overlapping only each other must still
        // render 2-wide.
        let events = vec![
            timed("a", (9, 0), (10, 0)),
            timed("b", (9, 0), (10, 0)),
            timed("c", (9, 0), (10, 0)),
            timed("d", (10, 30), (11, 30)),
            timed("e", (11, 0), (12, 0)),
        ];
        let layouts = layout_of(&events);

        for id in ["a", "b", "c"] {
            assert_eq!(layouts[id].total_columns, 3);
        }
        assert_eq!(
            layouts["d"],
            ColumnLayout {
                column: 0,
                total_columns: 2
            }
        );
        assert_eq!(
            layouts["e"],
            ColumnLayout {
                column: 1,
                total_columns: 2
            }
        );
    }

    #[test]
    fn overlapping_events_never_share_a_column() {
        let events = vec![
            timed("a", (9, 0), (11, 0)),
            timed("b", (9, 15), (10, 0)),
            timed("c", (9, 30), (12, 0)),
            timed("d", (10, 15), (11, 30)),
            timed("e", (9, 45), (10, 30)),
        ];
        let layouts = layout_of(&events);

        for first in &events {
            for second in &events {
                if first.id == second.id {
                    continue;
                }
                let (a, b) = (first.as_timed().unwrap(), second.as_timed().unwrap());
                let overlap = a.start < b.end && b.start < a.end;
                if overlap {
                    assert_ne!(
                        layouts[first.id.as_str()].column, layouts[second.id.as_str()].column,
                        "{} and {} overlap but share a column",
                        first.id, second.id
                    );
                }
            }
        }
    }

    #[test]
    fn ties_break_by_id_for_determinism() {
        let mut events = vec![
            timed("zebra", (9, 0), (10, 0)),
            timed("alpha", (9, 0), (10, 0)),
        ];
        let forward = layout_of(&events);
        events.reverse();
        let reversed = layout_of(&events);

        assert_eq!(forward, reversed);
        assert_eq!(forward["alpha"].column, 0);
        assert_eq!(forward["zebra"].column, 1);
    }

    #[test]
    fn zero_duration_events_are_excluded() {
        let zero = Event::timed("z", "z", stamp(9, 0), stamp(10, 0))
            .map(|mut e| {
                e.time = crate::models::event::EventTime::Timed {
                    start: stamp(9, 0),
                    end: stamp(9, 0),
                };
                e
            })
            .unwrap();
        let events = vec![zero, timed("a", (9, 0), (10, 0))];
        let layouts = layout_of(&events);

        assert!(!layouts.contains_key("z"));
        assert_eq!(layouts["a"].total_columns, 1);
    }

    #[test]
    fn midnight_crossing_event_clamps_to_end_of_day() {
        let crossing = Event::timed(
            "late",
            "late",
            stamp(23, 0),
            stamp(1, 0) + chrono::Duration::days(1),
        )
        .unwrap();
        let events = vec![crossing, timed("evening", (23, 30), (23, 45))];
        let layouts = layout_of(&events);

        // The crosser occupies 23:00-24:00 for layout, so the 23:30
        // event overlaps it and both get columns.
        assert_eq!(layouts["late"].total_columns, 2);
        assert_eq!(layouts["evening"].total_columns, 2);
        assert_ne!(layouts["late"].column, layouts["evening"].column);
    }

    #[test]
    fn column_reused_after_occupant_ends() {
        // Back-to-back events share the first column; only true overlap
        // opens a second one.
        let events = vec![
            timed("a", (9, 0), (10, 0)),
            timed("b", (10, 0), (11, 0)),
            timed("c", (11, 0), (12, 0)),
        ];
        let layouts = layout_of(&events);

        for id in ["a", "b", "c"] {
            assert_eq!(
                layouts[id],
                ColumnLayout {
                    column: 0,
                    total_columns: 1
                }
            );
        }
    }

    #[test]
    fn visual_floor_extends_short_events_only() {
        assert_eq!(visual_end_minutes(540, 550, WEEK_MIN_EVENT_MINUTES), 560);
        assert_eq!(visual_end_minutes(540, 600, WEEK_MIN_EVENT_MINUTES), 600);
        // Floored height never spills past the bottom of the day
        assert_eq!(visual_end_minutes(1435, 1439, DAY_MIN_EVENT_MINUTES), 1440);
    }
}
