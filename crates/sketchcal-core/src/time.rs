//! Clock time to vertical offset mapping for calendar cards.

use chrono::Timelike;

/// Map the clock time of `time` linearly into `[offset_start, offset_end]`.
///
/// Minutes since `start_hour` are clamped to the `start_hour..end_hour`
/// window first, so anything before the window maps to `offset_start` and
/// anything after maps to `offset_end`. Seconds are ignored. An empty or
/// inverted window maps everything to `offset_start`.
pub fn get_time_offset(
    time: impl Timelike,
    start_hour: u32,
    end_hour: u32,
    offset_start: f64,
    offset_end: f64,
) -> f64 {
    let total_minutes = (f64::from(end_hour) - f64::from(start_hour)) * 60.0;
    if total_minutes <= 0.0 {
        return offset_start;
    }
    let minutes_since_start =
        (f64::from(time.hour()) - f64::from(start_hour)) * 60.0 + f64::from(time.minute());
    let clamped = minutes_since_start.clamp(0.0, total_minutes);
    offset_start + clamped / total_minutes * (offset_end - offset_start)
}
