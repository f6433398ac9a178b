//! Delimited text reader for accident exports.
//!
//! PRF open-data exports are `;`-separated and frequently Latin-1 encoded,
//! so the delimiter is sniffed from the header line and non-UTF-8 input is
//! decoded byte-per-char.

use std::path::Path;

use crate::SourceError;
use crate::cell::{Cell, Table};

/// Reads a CSV file at `path` into a [`Table`].
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or is not valid CSV.
pub fn read_csv(path: &Path) -> Result<Table, SourceError> {
    let text = decode(std::fs::read(path)?);
    let delimiter = sniff_delimiter(&text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_owned())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(Cell::text).collect());
    }

    log::debug!(
        "Read {} rows from {} (delimiter {:?})",
        rows.len(),
        path.display(),
        char::from(delimiter)
    );

    Ok(Table { headers, rows })
}

/// Picks `;` when the header line contains one, `,` otherwise.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains(';') { b';' } else { b',' }
}

/// Decodes UTF-8, falling back to Latin-1 for legacy exports.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Source is not valid UTF-8, decoding as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}
