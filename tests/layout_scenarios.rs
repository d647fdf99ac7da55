// Scenario tests for the layout engine and color resolution working
// over realistic day mixes, as the views consume them.

mod fixtures;

use fixtures::{holiday, monday, tagged, timed};
use pretty_assertions::assert_eq;

use timepane::models::color_rule::ColorRule;
use timepane::models::event::Event;
use timepane::services::color;
use timepane::services::layout::{layout_day, ColumnLayout};

fn layout_of(events: &[Event]) -> std::collections::HashMap<String, ColumnLayout> {
    layout_day(monday(), events.iter().filter_map(|e| e.as_timed()))
}

#[test]
fn morning_chain_packs_into_two_columns() {
    // A 09:00-10:00, B 09:30-10:30, C 10:00-11:00. {A,B} and {B,C}
    // overlap, A and C do not: A and C share a column, B gets its own,
    // everyone renders 2-wide.
    let events = vec![
        timed("a", "Standup", (9, 0), (10, 0)),
        timed("b", "Design review", (9, 30), (10, 30)),
        timed("c", "Office hours", (10, 0), (11, 0)),
    ];
    let layouts = layout_of(&events);

    assert_eq!(layouts["a"], ColumnLayout { column: 0, total_columns: 2 });
    assert_eq!(layouts["b"], ColumnLayout { column: 1, total_columns: 2 });
    assert_eq!(layouts["c"], ColumnLayout { column: 0, total_columns: 2 });
}

#[test]
fn all_day_events_never_enter_the_layout() {
    let events = vec![
        holiday("h1", "Reading day"),
        timed("a", "Standup", (9, 0), (9, 30)),
    ];
    let layouts = layout_of(&events);

    assert!(!layouts.contains_key("h1"));
    assert_eq!(layouts["a"], ColumnLayout { column: 0, total_columns: 1 });
}

#[test]
fn dense_day_keeps_the_no_overlap_invariant() {
    // Twelve events with assorted overlaps: any two events that truly
    // overlap in time must land in distinct columns of the same group.
    let mut events = Vec::new();
    for i in 0..12u32 {
        let start = 8 * 60 + i * 25;
        let end = start + 55;
        events.push(timed(
            &format!("e{i:02}"),
            "Busy",
            (start / 60, start % 60),
            (end / 60, end % 60),
        ));
    }
    let layouts = layout_of(&events);

    for first in &events {
        for second in &events {
            if first.id >= second.id {
                continue;
            }
            let a = first.as_timed().unwrap();
            let b = second.as_timed().unwrap();
            if a.start < b.end && b.start < a.end {
                assert_ne!(
                    layouts[&first.id].column, layouts[&second.id].column,
                    "{} and {} overlap but share a column",
                    first.id, second.id
                );
            }
        }
    }
}

#[test]
fn layout_ignores_event_list_order() {
    let mut events = vec![
        timed("a", "One", (9, 0), (10, 0)),
        timed("b", "Two", (9, 15), (10, 15)),
        timed("c", "Three", (9, 30), (10, 30)),
        timed("d", "Four", (11, 0), (12, 0)),
    ];
    let forward = layout_of(&events);

    events.rotate_left(2);
    let rotated = layout_of(&events);
    events.reverse();
    let reversed = layout_of(&events);

    assert_eq!(forward, rotated);
    assert_eq!(forward, reversed);
}

#[test]
fn tagged_event_keeps_its_classification_color_in_a_busy_list() {
    let rules = vec![ColorRule::new(
        "r1",
        "Study",
        vec!["review".to_string()],
        "#111111",
    )];
    let events = vec![
        timed("a", "Design review", (9, 0), (10, 0)),
        tagged("b", "Exam review", "[type: exam] ch. 1-4", (9, 30), (10, 30)),
    ];

    // Rule color for the plain event, tag palette for the tagged one
    // even though its title also matches the rule.
    let plain = color::resolve(&events[0].summary, None, 0, &rules);
    let classified = color::resolve(
        &events[1].summary,
        events[1].description.as_deref(),
        1,
        &rules,
    );

    assert_eq!(plain, "#111111");
    assert_eq!(classified, "#C62828");
}
