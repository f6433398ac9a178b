//! Format-neutral cell values and column lookup.
//!
//! Both the spreadsheet and the CSV readers produce a [`Table`] of
//! [`Cell`]s so that normalization does not care where a row came from.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::SourceError;
use crate::parsing::{
    parse_coordinate, parse_day_first_date, parse_time_of_day, serial_to_date, serial_to_time,
};

/// Column holding the accident date (day-first).
pub const DATE_COLUMN: &str = "data";
/// Column holding the accident time-of-day.
pub const TIME_COLUMN: &str = "hora";
/// Column holding the day-phase label.
pub const DAY_PHASE_COLUMN: &str = "fase_dia";
/// Column holding the accident cause label.
pub const CAUSE_COLUMN: &str = "causa_acidente";
/// Column holding the latitude.
pub const LATITUDE_COLUMN: &str = "latitude";
/// Column holding the longitude.
pub const LONGITUDE_COLUMN: &str = "longitude";

static EMPTY: Cell = Cell::Empty;

/// A single cell value as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Blank cell.
    Empty,
    /// Text cell (CSV fields are always text).
    Text(String),
    /// Numeric cell, possibly a spreadsheet serial date/time.
    Number(f64),
    /// Native spreadsheet date/time value.
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Creates a text cell, mapping blank strings to [`Cell::Empty`].
    #[must_use]
    pub fn text(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_owned())
        }
    }

    /// Interprets the cell as a calendar date.
    #[must_use]
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Empty => None,
            Self::Text(s) => parse_day_first_date(s),
            Self::Number(n) => serial_to_date(*n),
            Self::DateTime(dt) => Some(dt.date()),
        }
    }

    /// Interprets the cell as a time-of-day.
    #[must_use]
    pub fn to_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Empty => None,
            Self::Text(s) => parse_time_of_day(s),
            Self::Number(n) => serial_to_time(*n),
            Self::DateTime(dt) => Some(dt.time()),
        }
    }

    /// Interprets the cell as a coordinate in decimal degrees.
    #[must_use]
    pub fn to_coordinate(&self) -> Option<f64> {
        match self {
            Self::Text(s) => parse_coordinate(s),
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) | Self::Empty | Self::DateTime(_) => None,
        }
    }

    /// Interprets the cell as a categorical label.
    #[must_use]
    pub fn to_label(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::DateTime(dt) => Some(dt.to_string()),
        }
    }

    /// Renders the cell for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Empty => "<empty>".to_string(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::DateTime(dt) => dt.to_string(),
        }
    }
}

/// A header row plus data rows, as read from a source file.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Trimmed header names in column order.
    pub headers: Vec<String>,
    /// Data rows. Rows may be shorter than `headers`.
    pub rows: Vec<Vec<Cell>>,
}

/// Positions of the known columns within a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub date: usize,
    pub time: usize,
    pub day_phase: usize,
    pub cause: usize,
    pub latitude: usize,
    pub longitude: usize,
}

impl ColumnIndex {
    /// Locates the known columns by exact header name. Every column is
    /// required; blank cells inside a present column are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::MissingColumn`] naming the first absent
    /// column.
    pub fn from_headers(headers: &[String]) -> Result<Self, SourceError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| SourceError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            date: require(DATE_COLUMN)?,
            time: require(TIME_COLUMN)?,
            day_phase: require(DAY_PHASE_COLUMN)?,
            cause: require(CAUSE_COLUMN)?,
            latitude: require(LATITUDE_COLUMN)?,
            longitude: require(LONGITUDE_COLUMN)?,
        })
    }
}

/// Returns the cell at `idx`, treating out-of-range positions as empty.
#[must_use]
pub fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn locates_columns_in_any_order() {
        let idx = ColumnIndex::from_headers(&headers(&[
            "id",
            "data",
            "hora",
            "causa_acidente",
            " fase_dia ",
            "longitude",
            "uf",
            "latitude",
        ]))
        .unwrap();
        assert_eq!(idx.date, 1);
        assert_eq!(idx.time, 2);
        assert_eq!(idx.cause, 3);
        assert_eq!(idx.day_phase, 4);
        assert_eq!(idx.longitude, 5);
        assert_eq!(idx.latitude, 7);
    }

    #[test]
    fn missing_time_column_is_an_error() {
        let err = ColumnIndex::from_headers(&headers(&["data", "fase_dia"])).unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { column } if column == "hora"));
    }

    #[test]
    fn missing_phase_column_is_an_error() {
        let err = ColumnIndex::from_headers(&headers(&[
            "data",
            "hora",
            "causa_acidente",
            "latitude",
            "longitude",
        ]))
        .unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { column } if column == "fase_dia"));
    }

    #[test]
    fn missing_coordinate_column_is_an_error() {
        let err = ColumnIndex::from_headers(&headers(&[
            "data",
            "hora",
            "fase_dia",
            "causa_acidente",
            "latitude",
        ]))
        .unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { column } if column == "longitude"));
    }

    #[test]
    fn blank_text_is_empty() {
        assert_eq!(Cell::text("   "), Cell::Empty);
        assert_eq!(Cell::text(" Noite "), Cell::Text("Noite".to_string()));
    }

    #[test]
    fn datetime_cells_split_into_date_and_time() {
        let dt = NaiveDate::from_ymd_opt(2018, 5, 6)
            .unwrap()
            .and_hms_opt(17, 45, 0)
            .unwrap();
        let cell = Cell::DateTime(dt);
        assert_eq!(cell.to_date(), NaiveDate::from_ymd_opt(2018, 5, 6));
        assert_eq!(cell.to_time(), NaiveTime::from_hms_opt(17, 45, 0));
        assert!(cell.to_coordinate().is_none());
    }

    #[test]
    fn out_of_range_cells_are_empty() {
        let row = vec![Cell::text("a")];
        assert_eq!(cell_at(&row, 0), &Cell::Text("a".to_string()));
        assert_eq!(cell_at(&row, 5), &Cell::Empty);
    }
}
