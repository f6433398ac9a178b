//! Workbook reader backed by `calamine`.
//!
//! Reads the first worksheet of an `.xlsx`/`.xls`/`.ods` file. The first row
//! is the header; every following row becomes a row of [`Cell`]s.

use std::path::Path;

use calamine::{Data, Reader as _, open_workbook_auto};

use crate::SourceError;
use crate::cell::{Cell, Table};

/// Reads the first worksheet of the workbook at `path`.
///
/// # Errors
///
/// Returns [`SourceError`] if the workbook cannot be opened, has no
/// worksheets, or the first worksheet has no header row.
pub fn read_workbook(path: &Path) -> Result<Table, SourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SourceError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(SourceError::EmptyWorkbook)?
        .iter()
        .map(|h| h.to_string().trim().to_owned())
        .collect();

    let rows: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    log::debug!(
        "Read {} rows x {} columns from {}",
        rows.len(),
        headers.len(),
        path.display()
    );

    Ok(Table { headers, rows })
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s),
        Data::Float(f) => Cell::Number(*f),
        #[allow(clippy::cast_precision_loss)]
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| Cell::Number(dt.as_f64()), Cell::DateTime),
    }
}
