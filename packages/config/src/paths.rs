#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the accident map data directory.
//!
//! All paths are relative to the project root's `data/` directory.

use std::path::{Path, PathBuf};

/// File name of the bundled PRF export for the Southeast region.
pub const DEFAULT_DATA_FILE: &str = "BD-PRF-SUDESTE.xlsx";

/// File name of the optional dashboard configuration.
pub const CONFIG_FILE: &str = "dashboard.toml";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`. Falls back to the
/// current directory if the manifest path is unexpectedly shallow.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the default accident spreadsheet path.
#[must_use]
pub fn default_data_path() -> PathBuf {
    data_dir().join(DEFAULT_DATA_FILE)
}

/// Returns the default configuration file path.
#[must_use]
pub fn default_config_path() -> PathBuf {
    project_root().join(CONFIG_FILE)
}
