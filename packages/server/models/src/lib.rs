#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the accident dashboard server.
//!
//! These types are serialized to JSON for the REST API. They wrap the
//! analytics result types so the API contract can evolve independently of
//! the aggregation code.

use accident_map_analytics_models::{CauseCount, GeoPoint, PeriodSummary, PhaseCount};
use accident_map_config::MapView;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Service health as returned by `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters selecting a period.
///
/// Dates are `YYYY-MM-DD`, times `HH:MM` or `HH:MM:SS`. Omitted parameters
/// default to the full dataset range and the full day.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionParams {
    /// First date included.
    pub date_from: Option<String>,
    /// Last date included.
    pub date_to: Option<String>,
    /// Earliest time-of-day included.
    pub time_from: Option<String>,
    /// Latest time-of-day included.
    pub time_to: Option<String>,
}

/// Selectable range of the loaded dataset, for initializing date pickers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBounds {
    /// Earliest accident date, `None` for an empty dataset.
    pub min_date: Option<NaiveDate>,
    /// Latest accident date, `None` for an empty dataset.
    pub max_date: Option<NaiveDate>,
    /// Default start of the time-of-day selection.
    pub default_time_from: NaiveTime,
    /// Default end of the time-of-day selection.
    pub default_time_to: NaiveTime,
    /// Number of loaded records.
    pub total_records: u64,
}

/// Initial map viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapView {
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Initial zoom level.
    pub zoom: f64,
    /// Marker radius in meters.
    pub point_radius: u32,
}

impl From<MapView> for ApiMapView {
    fn from(view: MapView) -> Self {
        Self {
            latitude: view.latitude,
            longitude: view.longitude,
            zoom: view.zoom,
            point_radius: view.point_radius,
        }
    }
}

/// Live record counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCount {
    /// Number of accidents in the selection.
    pub count: u64,
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    /// First date included.
    pub date_from: NaiveDate,
    /// Last date included.
    pub date_to: NaiveDate,
    /// Earliest time-of-day included.
    pub time_from: NaiveTime,
    /// Latest time-of-day included.
    pub time_to: NaiveTime,
    /// Number of accidents in the selection.
    pub count: u64,
    /// Accidents per day phase (bar chart).
    pub phases: Vec<PhaseCount>,
    /// Most frequent causes (pie chart).
    pub causes: Vec<CauseCount>,
    /// Accident locations (scatter map).
    pub points: Vec<GeoPoint>,
    /// Initial map viewport.
    pub map_view: ApiMapView,
}

impl ApiSummary {
    /// Builds the API response from an analytics summary.
    #[must_use]
    pub fn new(summary: PeriodSummary, map_view: MapView) -> Self {
        Self {
            date_from: summary.bounds.date_from,
            date_to: summary.bounds.date_to,
            time_from: summary.bounds.time_from,
            time_to: summary.bounds.time_to,
            count: summary.count,
            phases: summary.phases,
            causes: summary.causes,
            points: summary.points,
            map_view: map_view.into(),
        }
    }
}

/// Error body for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable description.
    pub error: String,
}
