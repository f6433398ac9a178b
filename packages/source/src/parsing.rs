//! Shared parsing utilities for accident spreadsheet cells.
//!
//! Dates are read day-first (`03/04/2019` is the 3rd of April), times accept
//! an optional seconds component, and coordinates accept the decimal comma
//! used by Brazilian exports.

use chrono::{Duration, NaiveDate, NaiveTime};

/// Spreadsheet serial day zero (the 1900 date system, leap-year bug included).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

const SECONDS_PER_DAY: f64 = 86_400.0;

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Parses a date string, reading ambiguous numeric dates day-first.
///
/// Accepts `DD/MM/YYYY`, `DD/MM/YY`, `DD-MM-YYYY` and `DD.MM.YYYY`, plus ISO
/// `YYYY-MM-DD`. A trailing time component (`" HH:MM[:SS]"` or
/// `"THH:MM:SS"`) must itself be a valid time and is then discarded.
#[must_use]
pub fn parse_day_first_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let (date_part, time_part) = match s.split_once([' ', 'T']) {
        Some((date, time)) => (date, Some(time.trim())),
        None => (s, None),
    };

    if let Some(time) = time_part
        && !time.is_empty()
        && parse_time_of_day(time).is_none()
    {
        return None;
    }

    let separator = date_part.chars().find(|c| matches!(c, '/' | '-' | '.'))?;
    let parts: Vec<&str> = date_part.split(separator).collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };

    if first.len() == 4 {
        // ISO order: year first
        let year = first.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, second.parse().ok()?, third.parse().ok()?);
    }

    if first.is_empty() || first.len() > 2 || second.is_empty() || second.len() > 2 {
        return None;
    }

    let day: u32 = first.parse().ok()?;
    let month: u32 = second.parse().ok()?;
    let year: i32 = match third.len() {
        2 => 2000 + third.parse::<i32>().ok()?,
        4 => third.parse().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses a time-of-day string (`HH:MM:SS`, `HH:MM:SS.fff` or `HH:MM`).
#[must_use]
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

/// Converts a spreadsheet serial number into a calendar date, ignoring any
/// fractional (time-of-day) part.
#[must_use]
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;

    #[allow(clippy::cast_possible_truncation)]
    let days = serial.floor() as i64;
    epoch.checked_add_signed(Duration::try_days(days)?)
}

/// Converts the fractional part of a spreadsheet serial number into a
/// time-of-day, rounded to the nearest second.
#[must_use]
pub fn serial_to_time(serial: f64) -> Option<NaiveTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let seconds = ((serial.fract() * SECONDS_PER_DAY).round() as u32).min(86_399);
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

/// Parses a coordinate in decimal degrees, accepting either `.` or `,` as
/// the decimal separator. Returns `None` for empty or non-numeric input.
#[must_use]
pub fn parse_coordinate(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let value = s.replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
