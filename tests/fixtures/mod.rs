// Test fixtures - reusable event builders
// Keeps scenario tests on one shared vocabulary of days and times.
#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use timepane::models::event::Event;

/// The Monday all scenario tests anchor to.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

pub fn at(hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 3, 10, hour, minute, 0)
        .unwrap()
}

/// Timed event on the anchor Monday.
pub fn timed(id: &str, summary: &str, start: (u32, u32), end: (u32, u32)) -> Event {
    Event::timed(id, summary, at(start.0, start.1), at(end.0, end.1)).unwrap()
}

/// Timed event carrying a description (e.g. a `[type: …]` tag).
pub fn tagged(id: &str, summary: &str, description: &str, start: (u32, u32), end: (u32, u32)) -> Event {
    let mut event = timed(id, summary, start, end);
    event.description = Some(description.to_string());
    event
}

/// One-day all-day event on the anchor Monday.
pub fn holiday(id: &str, summary: &str) -> Event {
    Event::all_day(id, summary, monday(), monday() + chrono::Duration::days(1)).unwrap()
}
