//! Clock/date text for the header datetime slot.
//!
//! The core only *resolves* datetime settings (`Screen::datetime`); turning
//! them into text is a host concern, and this module is the built-in host
//! formatter used by the CLI and the exporter. A live host re-renders the
//! text once per second, restarting its ticker whenever it applies a new
//! screen so at most one ticker runs.
//!
//! Times are UTC — the standard library exposes no timezone database, and
//! pulling one in for a header clock is not worth it. Weekday names are
//! English; `locale` is carried through the config for hosts that bring
//! their own tables.
//!
//! Recognized formats, everything else falling back to the first listed:
//!
//! | field            | values                                  |
//! |------------------|-----------------------------------------|
//! | `time_format`    | `HH:MM:SS`, anything else → `HH:MM`     |
//! | `date_format`    | `DD.MM.YYYY`, `MM.DD.YYYY`, `DD.MM`, `MM.DD` |
//! | `weekday_format` | `short` (`Tue`), `long` (`Tuesday`)     |

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::DatetimeConfig;

const SHORT_WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const LONG_WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// A broken-down UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: i64,
    /// 1-12
    pub month: u8,
    /// 1-31
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u8,
}

impl Timestamp {
    /// The current UTC time. A clock before the epoch reads as the epoch.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self::from_unix(secs)
    }

    /// Convert seconds since the Unix epoch to civil UTC fields.
    pub fn from_unix(secs: i64) -> Self {
        let days = secs.div_euclid(86_400);
        let tod = secs.rem_euclid(86_400);
        let (year, month, day) = civil_from_days(days);
        // Day 0 (1970-01-01) was a Thursday.
        let weekday = ((days.rem_euclid(7) + 4) % 7) as u8;
        Self {
            year,
            month,
            day,
            hour: (tod / 3600) as u8,
            minute: (tod % 3600 / 60) as u8,
            second: (tod % 60) as u8,
            weekday,
        }
    }
}

/// Days since 1970-01-01 to (year, month, day), proleptic Gregorian.
///
/// The era-based conversion from Howard Hinnant's date algorithms paper;
/// exact for the whole i64 day range we can ever see.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

/// Clock text per `time_format`.
pub fn format_time(config: &DatetimeConfig, ts: &Timestamp) -> String {
    if config.time_format == "HH:MM:SS" {
        format!("{:02}:{:02}:{:02}", ts.hour, ts.minute, ts.second)
    } else {
        format!("{:02}:{:02}", ts.hour, ts.minute)
    }
}

/// Date text per `date_format`.
pub fn format_date(config: &DatetimeConfig, ts: &Timestamp) -> String {
    let (dd, mm, yyyy) = (ts.day, ts.month, ts.year);
    match config.date_format.as_str() {
        "MM.DD.YYYY" => format!("{mm:02}.{dd:02}.{yyyy}"),
        "MM.DD" => format!("{mm:02}.{dd:02}"),
        "DD.MM" => format!("{dd:02}.{mm:02}"),
        _ => format!("{dd:02}.{mm:02}.{yyyy}"),
    }
}

/// Weekday name per `weekday_format`.
pub fn format_weekday(config: &DatetimeConfig, ts: &Timestamp) -> String {
    let idx = usize::from(ts.weekday % 7);
    if config.weekday_format == "long" {
        LONG_WEEKDAYS[idx].to_string()
    } else {
        SHORT_WEEKDAYS[idx].to_string()
    }
}

/// The full header text in display order: weekday, date, clock.
///
/// Only the parts enabled by the `show_*` flags appear; with all three off
/// the result is empty (though projection hides the slot before it gets
/// here).
pub fn format_line(config: &DatetimeConfig, ts: &Timestamp) -> String {
    let mut parts = Vec::new();
    if config.show_weekday {
        parts.push(format_weekday(config, ts));
    }
    if config.show_date {
        parts.push(format_date(config, ts));
    }
    if config.show_clock {
        parts.push(format_time(config, ts));
    }
    parts.join(" ")
}

// ============================================================================
// Tests
// ============================================================================
