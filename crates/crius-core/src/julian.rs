//! UTC timestamp to Julian Day conversion.
//!
//! The engine's native time representation is the Julian Day: a continuous
//! fractional day count. Callers must supply an already-UTC instant; no
//! timezone conversion happens here.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Converts a UTC instant to a Julian Day.
///
/// Uses the proleptic Gregorian calendar. The integer day number comes from
/// the Fliegel--Van Flandern algorithm; the fractional part is
/// `hour/24 + minute/1440 + second/86400` (sub-second precision included)
/// measured from midnight, with the JD epoch offset of 0.5 day applied so
/// that noon lands on an integer JD.
#[must_use]
pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    let day_number = gregorian_day_number(instant.year(), instant.month(), instant.day());

    let seconds = f64::from(instant.hour()) * 3600.0
        + f64::from(instant.minute()) * 60.0
        + f64::from(instant.second())
        + f64::from(instant.nanosecond()) / 1e9;

    day_number as f64 - 0.5 + seconds / 86_400.0
}

/// Julian Day Number at noon for a proleptic Gregorian calendar date
/// (Fliegel--Van Flandern).
fn gregorian_day_number(year: i32, month: u32, day: u32) -> i64 {
    let y = i64::from(year);
    let m = i64::from(month);
    let d = i64::from(day);

    let a = (14 - m) / 12;
    let y = y + 4800 - a;
    let m = m + 12 * a - 3;

    d + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
