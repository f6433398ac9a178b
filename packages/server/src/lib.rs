#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the accident dashboard.
//!
//! Loads the accident spreadsheet once at startup and serves the filtered
//! aggregations (record counter, day-phase histogram, cause ranking, map
//! points) as JSON for a charting frontend. Every request recomputes its
//! selection from the immutable dataset; nothing is cached per request.

mod handlers;
pub mod interactive;

use std::sync::Arc;

use accident_map_config::DashboardConfig;
use accident_map_source::{Dataset, DatasetCache, SourceError};
use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

/// Errors that can prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The accident dataset could not be loaded.
    #[error("Failed to load accident data: {0}")]
    DataLoad(#[from] SourceError),

    /// The HTTP server failed to bind or crashed.
    #[error("HTTP server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
///
/// Holds the memoized dataset rather than a loaded copy, so every worker
/// and every request reads the same [`Arc<Dataset>`].
pub struct AppState {
    /// The accident records, loaded once and shared read-only.
    pub cache: DatasetCache,
    /// Dashboard configuration (cause ranking, map viewport).
    pub config: DashboardConfig,
}

impl AppState {
    /// Creates the dataset cache for `config.data_path` and warms it, so a
    /// load failure surfaces before the server binds.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the dataset cannot be loaded.
    pub fn load(config: DashboardConfig) -> Result<Self, SourceError> {
        let cache = DatasetCache::new(&config.data_path);
        cache.get()?;
        Ok(Self { cache, config })
    }

    /// Wraps an already-loaded dataset.
    #[must_use]
    pub fn from_dataset(dataset: Dataset, config: DashboardConfig) -> Self {
        Self {
            cache: DatasetCache::preloaded(&config.data_path, dataset),
            config,
        }
    }

    /// Returns the shared dataset.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the cache was never warmed and loading
    /// now fails.
    pub fn dataset(&self) -> Result<Arc<Dataset>, SourceError> {
        self.cache.get()
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/bounds", web::get().to(handlers::bounds))
            .route("/map-view", web::get().to(handlers::map_view))
            .route("/summary", web::get().to(handlers::summary))
            .route("/count", web::get().to(handlers::count))
            .route("/phases", web::get().to(handlers::phases))
            .route("/causes", web::get().to(handlers::causes))
            .route("/points", web::get().to(handlers::points)),
    );
}

/// Starts the accident dashboard API server.
///
/// Loads the dataset named in `config` and serves it until the server is
/// shut down. The caller is responsible for providing the async runtime
/// (e.g. via `#[actix_web::main]`). A dataset load failure aborts startup.
///
/// # Errors
///
/// Returns [`ServerError`] if the dataset cannot be loaded or the HTTP
/// server fails to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: DashboardConfig) -> Result<(), ServerError> {
    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;

    log::info!("Loading accident data from {}...", config.data_path.display());
    let state = web::Data::new(AppState::load(config)?);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
