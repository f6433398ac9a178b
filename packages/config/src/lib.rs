#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard configuration.
//!
//! Settings come from an optional `dashboard.toml` (path overridable with
//! `ACCIDENT_MAP_CONFIG`), then from environment variables:
//!
//! * `ACCIDENT_MAP_DATA` - accident spreadsheet path
//! * `BIND_ADDR` - server bind address
//! * `PORT` - server port
//!
//! Every setting has a default, so a missing file is not an error.

pub mod paths;

use std::path::{Path, PathBuf};

use accident_map_analytics_models::CauseRankingConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "ACCIDENT_MAP_CONFIG";
/// Environment variable naming the accident spreadsheet.
pub const DATA_PATH_ENV: &str = "ACCIDENT_MAP_DATA";
/// Environment variable naming the bind address.
pub const BIND_ADDR_ENV: &str = "BIND_ADDR";
/// Environment variable naming the port.
pub const PORT_ENV: &str = "PORT";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`DashboardConfig`].
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override has an unusable value.
    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv {
        /// Variable name.
        name: String,
        /// Rejected value.
        value: String,
    },
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Initial map viewport and marker styling.
///
/// Defaults center on Belo Horizonte, where the Southeast dataset is
/// clustered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapView {
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Initial zoom level.
    pub zoom: f64,
    /// Marker radius in meters.
    pub point_radius: u32,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            latitude: -19.9198,
            longitude: -43.9290,
            zoom: 5.0,
            point_radius: 500,
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Accident spreadsheet to load.
    pub data_path: PathBuf,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Map viewport.
    pub map: MapView,
    /// Cause ranking cutoff and overflow policy.
    pub causes: CauseRankingConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: paths::default_data_path(),
            server: ServerConfig::default(),
            map: MapView::default(),
            causes: CauseRankingConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Loads the configuration file named by `ACCIDENT_MAP_CONFIG` (or
    /// `dashboard.toml` in the project root) and applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but is unreadable or
    /// invalid, or if an environment override cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map_or_else(|_| paths::default_config_path(), PathBuf::from);

        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Reads the configuration at `path`, returning defaults if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is unreadable or invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        log::info!("Reading configuration from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parses a TOML document. Omitted keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is invalid.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `ACCIDENT_MAP_DATA`, `BIND_ADDR` and `PORT` overrides
    /// resolved through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] if `PORT` is not a valid port.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = lookup(DATA_PATH_ENV) {
            self.data_path = PathBuf::from(path);
        }

        if let Some(bind_addr) = lookup(BIND_ADDR_ENV) {
            self.server.bind_addr = bind_addr;
        }

        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                name: PORT_ENV.to_string(),
                value: port,
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use accident_map_analytics_models::OverflowPolicy;

    #[test]
    fn empty_document_yields_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.causes.top_n, 7);
        assert_eq!(config.server.port, 8080);
        assert!((config.map.latitude - -19.9198).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_partial_sections() {
        let config = DashboardConfig::from_toml_str(
            r#"
data_path = "/srv/prf/acidentes.csv"

[server]
port = 9000

[causes]
top_n = 5
overflow_policy = "merge"
"#,
        )
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/srv/prf/acidentes.csv"));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert_eq!(config.causes.top_n, 5);
        assert_eq!(config.causes.overflow_policy, OverflowPolicy::Merge);
        assert_eq!(config.causes.other_label, "Outros");
        assert_eq!(config.map, MapView::default());
    }

    #[test]
    fn rejects_invalid_toml() {
        assert!(matches!(
            DashboardConfig::from_toml_str("[server]\nport = \"eighty\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn env_overrides_win() {
        let mut config = DashboardConfig::default();
        config
            .apply_overrides(|name| match name {
                DATA_PATH_ENV => Some("/tmp/acidentes.xlsx".to_string()),
                BIND_ADDR_ENV => Some("0.0.0.0".to_string()),
                PORT_ENV => Some("3000".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/tmp/acidentes.xlsx"));
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn rejects_invalid_port_override() {
        let mut config = DashboardConfig::default();
        let err = config
            .apply_overrides(|name| (name == PORT_ENV).then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name, .. } if name == PORT_ENV));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("accident_map_missing_dashboard.toml");
        let _ = std::fs::remove_file(&path);
        assert_eq!(
            DashboardConfig::from_file(&path).unwrap(),
            DashboardConfig::default()
        );
    }
}
