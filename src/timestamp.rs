// Normalized timestamp and date strings

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use eyre::{Context, Result, eyre};

/// Storage format for start and deadline timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Accepted on read for rows written by other tools
const LENIENT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

// Years that format as exactly four digits, which SQLite's date() requires
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS`, dropping sub-second precision
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Render a timestamp for storage, rejecting years outside 0000-9999
pub fn to_stored(ts: NaiveDateTime) -> Result<String> {
    if !STORABLE_YEARS.contains(&ts.year()) {
        return Err(eyre!(
            "Timestamp year {} cannot be stored as YYYY-MM-DD HH:MM:SS",
            ts.year()
        ));
    }
    Ok(format_timestamp(ts))
}

/// Render a calendar date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored timestamp
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }

    LENIENT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| eyre!("Invalid timestamp '{}', expected YYYY-MM-DD HH:MM:SS", s))
}

/// Parse a calendar date given as `YYYY-MM-DD`
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s.trim()))
}

/// Parse a wall-clock time given as `HH:MM` into (hour, minute)
pub fn parse_clock(s: &str) -> Result<(u32, u32)> {
    let (hour, minute) = s
        .trim()
        .split_once(':')
        .ok_or_else(|| eyre!("Invalid time '{}', expected HH:MM", s.trim()))?;

    let hour: u32 = hour.parse().with_context(|| format!("Invalid hour '{}'", hour))?;
    let minute: u32 = minute.parse().with_context(|| format!("Invalid minute '{}'", minute))?;

    Ok((hour, minute))
}

/// Combine a calendar date with an hour and minute; seconds are zero
pub fn combine(date: NaiveDate, hour: u32, minute: u32) -> Result<NaiveDateTime> {
    if hour > 23 {
        return Err(eyre!("Hour must be between 0 and 23, got {}", hour));
    }
    if minute > 59 {
        return Err(eyre!("Minute must be between 0 and 59, got {}", minute));
    }

    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| eyre!("Invalid time {}:{}", hour, minute))?;
    Ok(date.and_time(time))
}

/// Current local time truncated to whole seconds
pub fn now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Current local calendar date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
