#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Highway accident record types.
//!
//! An [`AccidentRecord`] is one row of the federal highway police accident
//! spreadsheet after normalization. The combined timestamp and weekday are
//! always derived from the calendar date and time-of-day through
//! [`AccidentRecord::new`], so the three stay consistent.

use chrono::{Datelike as _, NaiveDate, NaiveDateTime, NaiveTime, Timelike as _};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Day of the week, numbered from Monday (0) to Sunday (6).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl Weekday {
    /// Returns the numeric value of this weekday (0 = Monday).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a weekday from its numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 0-6.
    pub const fn from_value(value: u8) -> Result<Self, InvalidWeekdayError> {
        match value {
            0 => Ok(Self::Monday),
            1 => Ok(Self::Tuesday),
            2 => Ok(Self::Wednesday),
            3 => Ok(Self::Thursday),
            4 => Ok(Self::Friday),
            5 => Ok(Self::Saturday),
            6 => Ok(Self::Sunday),
            _ => Err(InvalidWeekdayError { value }),
        }
    }
}

/// Error returned when attempting to create a [`Weekday`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWeekdayError {
    /// The invalid weekday value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidWeekdayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid weekday value {}: expected 0-6", self.value)
    }
}

impl std::error::Error for InvalidWeekdayError {}

/// One accident after loading and normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentRecord {
    /// Calendar date of the accident.
    pub date: NaiveDate,
    /// Time-of-day, re-derived from [`Self::timestamp`].
    pub time: NaiveTime,
    /// `date` and `time` combined. Canonical ordering key.
    pub timestamp: NaiveDateTime,
    /// Day of the week derived from `timestamp` (0 = Monday .. 6 = Sunday).
    pub day_of_week: u8,
    /// Source-provided day-phase label (e.g. `"Pleno dia"`, `"Plena Noite"`).
    pub day_phase: Option<String>,
    /// Source-provided accident cause label.
    pub cause: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
}

impl AccidentRecord {
    /// Builds a record from its source fields, deriving the timestamp, the
    /// second-precision time and the weekday.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        day_phase: Option<String>,
        cause: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Self {
        let time = time.with_nanosecond(0).unwrap_or(time);
        let timestamp = date.and_time(time);

        #[allow(clippy::cast_possible_truncation)]
        let day_of_week = timestamp.weekday().num_days_from_monday() as u8;

        Self {
            date: timestamp.date(),
            time: timestamp.time(),
            timestamp,
            day_of_week,
            day_phase,
            cause,
            latitude,
            longitude,
        }
    }

    /// Returns the weekday as an enum.
    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        match Weekday::from_value(self.day_of_week) {
            Ok(weekday) => weekday,
            Err(_) => Weekday::Monday,
        }
    }

    /// Returns `(latitude, longitude)` when both coordinates are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}
