#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident spreadsheet loader.
//!
//! [`load`] reads a PRF accident export (workbook or CSV), normalizes the
//! day-first dates, derives each record's timestamp and weekday, and returns
//! an immutable [`Dataset`] sorted by timestamp. [`DatasetCache`] memoizes
//! that load for the lifetime of the process.

pub mod cell;
pub mod csv_file;
pub mod parsing;
pub mod progress;
pub mod spreadsheet;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use accident_map_accident_models::AccidentRecord;
use chrono::NaiveDate;

use crate::cell::{Cell, ColumnIndex, Table, cell_at};
use crate::progress::{ProgressCallback, null_progress};

/// Rows normalized between progress updates.
const PROGRESS_BATCH: usize = 10_000;

/// Errors that can occur while loading the accident dataset.
///
/// Any of these aborts the whole load; no partial dataset is produced.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file missing or unreadable).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook could not be opened or decoded.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The workbook has no worksheet or no header row.
    #[error("Workbook has no worksheet with a header row")]
    EmptyWorkbook,

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// A date cell could not be parsed.
    #[error("Invalid date '{value}' on row {row}")]
    InvalidDate {
        /// One-based row number in the source file (header is row 1).
        row: usize,
        /// The offending cell content.
        value: String,
    },

    /// A time cell could not be parsed.
    #[error("Invalid time '{value}' on row {row}")]
    InvalidTime {
        /// One-based row number in the source file (header is row 1).
        row: usize,
        /// The offending cell content.
        value: String,
    },

    /// The file extension is not a supported source format.
    #[error("Unsupported source format: {path}")]
    UnsupportedFormat {
        /// Path of the rejected file.
        path: String,
    },

    /// A previous initialization panicked while holding the cache lock.
    #[error("Dataset cache lock poisoned")]
    CachePoisoned,
}

/// The full accident record set, sorted ascending by timestamp.
///
/// Records cannot be mutated once loaded; downstream stages receive
/// read-only slices and produce their own copies.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<AccidentRecord>,
}

impl Dataset {
    /// Builds a dataset from already-normalized records, sorting them by
    /// timestamp. The sort is stable, so records sharing a timestamp keep
    /// their source order.
    #[must_use]
    pub fn from_records(mut records: Vec<AccidentRecord>) -> Self {
        records.sort_by_key(|r| r.timestamp);
        Self { records }
    }

    /// Returns all records in timestamp order.
    #[must_use]
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Number of loaded records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the source contained no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the earliest and latest calendar dates, or `None` when empty.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.date, last.date))
    }
}

/// Loads the dataset at `path` without progress reporting.
///
/// # Errors
///
/// Returns [`SourceError`] if the file is missing, unreadable, lacks the
/// required columns, or contains an unparseable date or time.
pub fn load(path: &Path) -> Result<Dataset, SourceError> {
    load_with_progress(path, &null_progress())
}

/// Loads the dataset at `path`, reporting normalized rows to `progress`.
///
/// The reader is chosen by extension: `.csv`/`.txt` go through the CSV
/// reader, workbook extensions through `calamine`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file is missing, unreadable, lacks the
/// required columns, or contains an unparseable date or time.
pub fn load_with_progress(
    path: &Path,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, SourceError> {
    log::info!("Loading accident records from {}", path.display());

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = match extension.as_str() {
        "csv" | "txt" => csv_file::read_csv(path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => spreadsheet::read_workbook(path)?,
        _ => {
            return Err(SourceError::UnsupportedFormat {
                path: path.display().to_string(),
            });
        }
    };

    let records = normalize_table(&table, progress)?;
    let dataset = Dataset::from_records(records);

    if let Some((min, max)) = dataset.date_range() {
        log::info!(
            "Loaded {} accident records spanning {min} to {max}",
            dataset.len()
        );
    } else {
        log::info!("Loaded an empty accident dataset");
    }

    Ok(dataset)
}

/// Converts every row of `table` into an [`AccidentRecord`].
///
/// # Errors
///
/// Returns [`SourceError`] on the first row whose date or time cannot be
/// parsed, or if a required column is missing.
pub fn normalize_table(
    table: &Table,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<AccidentRecord>, SourceError> {
    let columns = ColumnIndex::from_headers(&table.headers)?;

    progress.set_total(table.rows.len() as u64);
    progress.set_message("Normalizing accident records".to_string());

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        // Header is row 1, so the first data row is row 2
        let row_number = i + 2;

        if row.iter().all(|c| *c == Cell::Empty) {
            log::debug!("Skipping blank row {row_number}");
        } else {
            records.push(normalize_row(row, &columns, row_number)?);
        }

        if (i + 1) % PROGRESS_BATCH == 0 {
            progress.inc(PROGRESS_BATCH as u64);
        }
    }

    progress.inc((table.rows.len() % PROGRESS_BATCH) as u64);
    progress.finish(format!("Normalized {} accident records", records.len()));

    Ok(records)
}

fn normalize_row(
    row: &[Cell],
    columns: &ColumnIndex,
    row_number: usize,
) -> Result<AccidentRecord, SourceError> {
    let date_cell = cell_at(row, columns.date);
    let date = date_cell.to_date().ok_or_else(|| SourceError::InvalidDate {
        row: row_number,
        value: date_cell.describe(),
    })?;

    let time_cell = cell_at(row, columns.time);
    let time = time_cell.to_time().ok_or_else(|| SourceError::InvalidTime {
        row: row_number,
        value: time_cell.describe(),
    })?;

    Ok(AccidentRecord::new(
        date,
        time,
        cell_at(row, columns.day_phase).to_label(),
        cell_at(row, columns.cause).to_label(),
        coordinate(row, columns.latitude, row_number),
        coordinate(row, columns.longitude, row_number),
    ))
}

fn coordinate(row: &[Cell], idx: usize, row_number: usize) -> Option<f64> {
    let cell = cell_at(row, idx);
    let value = cell.to_coordinate();
    if value.is_none() && *cell != Cell::Empty {
        log::warn!(
            "Ignoring unparseable coordinate '{}' on row {row_number}",
            cell.describe()
        );
    }
    value
}

/// Lazily loads a dataset once and hands out shared references to it.
///
/// The first successful [`DatasetCache::get`] parses the source; every
/// later call returns the same [`Arc`]. A failed load leaves the cache
/// empty so the next call retries.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceLock<Arc<Dataset>>,
    init: Mutex<()>,
}

impl DatasetCache {
    /// Creates an empty cache for the source at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Creates a cache that already holds `dataset`, for records that were
    /// loaded or built elsewhere.
    #[must_use]
    pub fn preloaded(path: impl Into<PathBuf>, dataset: Dataset) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::from(Arc::new(dataset)),
            init: Mutex::new(()),
        }
    }

    /// Path of the cached source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the dataset has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the dataset, loading it on first access.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the first load fails.
    pub fn get(&self) -> Result<Arc<Dataset>, SourceError> {
        self.get_with_progress(&null_progress())
    }

    /// Returns the dataset, loading it on first access with progress
    /// reporting.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the first load fails.
    pub fn get_with_progress(
        &self,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<Arc<Dataset>, SourceError> {
        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }

        let _guard = self.init.lock().map_err(|_| SourceError::CachePoisoned)?;

        // Another caller may have finished loading while we waited
        if let Some(dataset) = self.cell.get() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_with_progress(&self.path, progress)?);
        Ok(Arc::clone(self.cell.get_or_init(|| dataset)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveTime;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    const FIXTURE: &str = "\
data;hora;fase_dia;causa_acidente;latitude;longitude
03/01/2018;12:00:00;Pleno dia;Velocidade Incompatível;-19,9198;-43,9290
01/01/2018;08:00:00;Amanhecer;Velocidade Incompatível;-20,1;-44,2
02/01/2018 00:00:00;23:00;Plena Noite;Ingestão de Álcool;;
01/01/2018;07:30:15;Amanhecer;Falta de Atenção;abc;-44
";

    #[test]
    fn loads_and_sorts_by_timestamp() {
        let path = write_fixture("accident_map_load_sorted.csv", FIXTURE);
        let dataset = load(&path).unwrap();

        let stamps: Vec<String> = dataset
            .records()
            .iter()
            .map(|r| r.timestamp.to_string())
            .collect();
        assert_eq!(
            stamps,
            vec![
                "2018-01-01 07:30:15",
                "2018-01-01 08:00:00",
                "2018-01-02 23:00:00",
                "2018-01-03 12:00:00",
            ]
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn derives_fields_from_day_first_dates() {
        let path = write_fixture("accident_map_load_fields.csv", FIXTURE);
        let dataset = load(&path).unwrap();

        let night = &dataset.records()[2];
        assert_eq!(night.date, NaiveDate::from_ymd_opt(2018, 1, 2).unwrap());
        assert_eq!(night.time, NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        // 2018-01-02 was a Tuesday
        assert_eq!(night.day_of_week, 1);
        assert_eq!(night.day_phase.as_deref(), Some("Plena Noite"));
        assert_eq!(night.cause.as_deref(), Some("Ingestão de Álcool"));
        assert!(night.coordinates().is_none());

        let (lat, lng) = dataset.records()[3].coordinates().unwrap();
        assert!((lat - -19.9198).abs() < f64::EPSILON);
        assert!((lng - -43.929).abs() < f64::EPSILON);

        // Unparseable latitude is dropped rather than failing the load
        assert!(dataset.records()[0].latitude.is_none());
        assert_eq!(dataset.records()[0].longitude, Some(-44.0));

        assert_eq!(
            dataset.date_range(),
            Some((
                NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2018, 1, 3).unwrap(),
            ))
        );

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn reloading_is_deterministic() {
        let path = write_fixture("accident_map_load_deterministic.csv", FIXTURE);
        let first = load(&path).unwrap();
        let second = load(&path).unwrap();

        let derived = |d: &Dataset| -> Vec<(String, u8)> {
            d.records()
                .iter()
                .map(|r| (r.timestamp.to_string(), r.day_of_week))
                .collect()
        };
        assert_eq!(derived(&first), derived(&second));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unparseable_date_fails_whole_load() {
        let path = write_fixture(
            "accident_map_load_bad_date.csv",
            "data,hora,fase_dia,causa_acidente,latitude,longitude\n\
             01/01/2018,08:00,Manhã,Velocidade,,\n\
             31/02/2018,09:00,Manhã,Velocidade,,\n",
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, SourceError::InvalidDate { row: 3, .. }));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unparseable_time_fails_whole_load() {
        let path = write_fixture(
            "accident_map_load_bad_time.csv",
            "data,hora,fase_dia,causa_acidente,latitude,longitude\n\
             01/01/2018,late,Manhã,Velocidade,,\n",
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, SourceError::InvalidTime { row: 2, .. }));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_required_columns_fail_whole_load() {
        let path = write_fixture(
            "accident_map_load_missing_columns.csv",
            "data;hora\n01/01/2018;08:00\n02/01/2018;09:00\n",
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, SourceError::MissingColumn { column } if column == "fase_dia"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_source_is_an_io_error() {
        let path = std::env::temp_dir().join("accident_map_does_not_exist.csv");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(load(&path), Err(SourceError::Io(_))));
    }

    #[test]
    fn rejects_unknown_extensions() {
        let path = Path::new("accidents.parquet");
        assert!(matches!(
            load(path),
            Err(SourceError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn header_only_source_is_empty() {
        let path = write_fixture("accident_map_load_empty.csv", "data;hora;fase_dia;causa_acidente;latitude;longitude\n");
        let dataset = load(&path).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.date_range().is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn cache_loads_once() {
        let path = write_fixture("accident_map_cache_once.csv", FIXTURE);
        let cache = DatasetCache::new(&path);
        assert!(!cache.is_loaded());

        let first = cache.get().unwrap();
        // Removing the source proves the second call does not re-read it
        std::fs::remove_file(&path).unwrap();
        let second = cache.get().unwrap();

        assert!(cache.is_loaded());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 4);
    }

    #[test]
    fn preloaded_cache_never_reads_its_path() {
        let path = std::env::temp_dir().join("accident_map_cache_preloaded.csv");
        let _ = std::fs::remove_file(&path);

        let cache = DatasetCache::preloaded(&path, Dataset::default());
        assert!(cache.is_loaded());
        assert!(cache.get().unwrap().is_empty());
        assert_eq!(cache.path(), path.as_path());
    }

    #[test]
    fn cache_retries_after_failure() {
        let path = std::env::temp_dir().join("accident_map_cache_retry.csv");
        let _ = std::fs::remove_file(&path);
        let cache = DatasetCache::new(&path);

        assert!(cache.get().is_err());
        assert!(!cache.is_loaded());

        std::fs::write(&path, FIXTURE).unwrap();
        assert_eq!(cache.get().unwrap().len(), 4);

        let _ = std::fs::remove_file(&path);
    }
}
