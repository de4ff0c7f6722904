/*!
 Contains date helpers for the UTC calendar arithmetic used by recurrence expansion.

 Palm archives store times as seconds since the Unix epoch, in UTC. No timezone adjustment is
 ever applied.
*/

use chrono::{DateTime, Datelike, Utc};

/// Number of seconds in one calendar day
pub const DAY_SECONDS: i64 = 24 * 60 * 60;

/// The UTC calendar fields of a single instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub year: i32,
    /// Zero-based month, January is `0`
    pub month0: u32,
    /// One-based day of the month
    pub day: u32,
    /// Days since Sunday, Sunday is `0`
    pub weekday: u32,
}

/// Convert epoch seconds to a UTC [`DateTime`]
pub fn get_utc_time(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}

/// Format epoch seconds with a `strftime`-style pattern, or an empty string if the time is out of range
pub fn format(timestamp: i64, pattern: &str) -> String {
    get_utc_time(timestamp)
        .map(|date| date.format(pattern).to_string())
        .unwrap_or_default()
}

/// Decompose epoch seconds into UTC calendar fields
pub fn calendar_day(timestamp: i64) -> Option<CalendarDay> {
    let date = get_utc_time(timestamp)?;
    Some(CalendarDay {
        year: date.year(),
        month0: date.month0(),
        day: date.day(),
        weekday: date.weekday().num_days_from_sunday(),
    })
}
