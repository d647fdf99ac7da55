// Time math for the pixel grid
// Conversions between instants, day-relative minute offsets and pixels

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};

/// Minutes in a full day; the upper clamp for every offset in the grid.
pub const MINUTES_PER_DAY: i32 = 1440;

/// Snap granularity for click-drag event creation.
pub const CREATE_SNAP_MINUTES: i32 = 15;

/// Snap granularity for drag-and-drop rescheduling.
pub const RESCHEDULE_SNAP_MINUTES: i32 = 5;

/// Minutes since local midnight of `day`, clamped to [0, 1440].
///
/// An instant before the day's midnight clamps to 0; an instant past the
/// following midnight clamps to 1440, which is how midnight-crossing
/// events get pinned to the bottom of their start day's column.
pub fn offset_minutes(instant: DateTime<Local>, day: NaiveDate) -> i32 {
    let Some(midnight) = day.and_hms_opt(0, 0, 0) else {
        return 0;
    };
    let minutes = (instant.naive_local() - midnight).num_minutes();
    minutes.clamp(0, MINUTES_PER_DAY as i64) as i32
}

/// Vertical pixel offset for a minute offset at the given hour height.
pub fn pixels_from_minutes(minutes: i32, hour_height: f32) -> f32 {
    minutes as f32 / 60.0 * hour_height
}

/// Inverse of [`pixels_from_minutes`]; used by the pointer adapters.
/// The result is unsnapped and unclamped — callers run it through
/// [`snap`] before acting on it.
pub fn minutes_from_pixels(y: f32, hour_height: f32) -> i32 {
    (y / hour_height * 60.0).round() as i32
}

/// Round `minutes` to the nearest multiple of `granularity`, then clamp
/// to [0, 1440]. Idempotent: snapping a snapped value is a no-op.
pub fn snap(minutes: i32, granularity: i32) -> i32 {
    if granularity <= 0 {
        return minutes.clamp(0, MINUTES_PER_DAY);
    }
    let rounded = ((minutes as f64 / granularity as f64).round() as i32) * granularity;
    rounded.clamp(0, MINUTES_PER_DAY)
}

/// Resolve `day` + minute offset into a local instant.
///
/// Offsets ≥ 1440 roll into the next day, so a drop at the very bottom
/// of a column lands on the following midnight. Returns `None` for
/// local times that do not exist (DST gap); callers treat that as an
/// invalid drop target.
pub fn day_time(day: NaiveDate, minutes: i32) -> Option<DateTime<Local>> {
    let naive = day.and_hms_opt(0, 0, 0)? + Duration::minutes(minutes as i64);
    Local.from_local_datetime(&naive).single()
}
