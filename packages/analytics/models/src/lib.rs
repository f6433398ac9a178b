#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter bounds and aggregation result types.
//!
//! These are the inputs and outputs of the period filter and the three
//! dashboard aggregations. They serialize to camelCase JSON so the server
//! can hand them to a frontend unchanged.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default number of causes kept by the cause ranking.
pub const DEFAULT_TOP_N: usize = 7;

/// Default label for merged overflow causes.
pub const DEFAULT_OTHER_LABEL: &str = "Outros";

/// Start of the default time-of-day selection.
#[must_use]
pub const fn default_time_from() -> NaiveTime {
    NaiveTime::MIN
}

/// End of the default time-of-day selection (`23:59`).
#[must_use]
pub fn default_time_to() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Inclusive date and time-of-day bounds for the period filter.
///
/// The time bounds are compared literally: a range whose start is later
/// than its end (e.g. `22:00`-`04:00`) matches nothing rather than
/// wrapping past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterBounds {
    /// First calendar date included.
    pub date_from: NaiveDate,
    /// Last calendar date included.
    pub date_to: NaiveDate,
    /// Earliest time-of-day included.
    pub time_from: NaiveTime,
    /// Latest time-of-day included.
    pub time_to: NaiveTime,
}

impl FilterBounds {
    /// Bounds covering the whole date range and the default full-day time
    /// selection (`00:00`-`23:59`).
    #[must_use]
    pub fn full(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from,
            date_to,
            time_from: default_time_from(),
            time_to: default_time_to(),
        }
    }

    /// Replaces the time-of-day bounds.
    #[must_use]
    pub const fn with_times(mut self, time_from: NaiveTime, time_to: NaiveTime) -> Self {
        self.time_from = time_from;
        self.time_to = time_to;
        self
    }

    /// Whether the time bounds would need midnight wrap-around to match
    /// anything. Such bounds always produce an empty selection.
    #[must_use]
    pub fn is_wrapping(&self) -> bool {
        self.time_from > self.time_to
    }
}

/// What the cause ranking does with causes ranked below the cutoff.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OverflowPolicy {
    /// Discard overflow causes entirely.
    #[default]
    Drop,
    /// Sum overflow causes into a single trailing "other" entry.
    Merge,
}

/// Cutoff and overflow handling for the cause ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct CauseRankingConfig {
    /// Number of top causes kept.
    pub top_n: usize,
    /// Handling of causes ranked below `top_n`.
    pub overflow_policy: OverflowPolicy,
    /// Label of the merged entry under [`OverflowPolicy::Merge`].
    pub other_label: String,
}

impl Default for CauseRankingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            overflow_policy: OverflowPolicy::Drop,
            other_label: DEFAULT_OTHER_LABEL.to_string(),
        }
    }
}

/// Number of accidents recorded in one day phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseCount {
    /// Day-phase label as provided by the source.
    pub phase: String,
    /// Number of accidents.
    pub count: u64,
}

/// Number of accidents attributed to one cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CauseCount {
    /// Cause label as provided by the source.
    pub cause: String,
    /// Number of accidents.
    pub count: u64,
}

/// A map point for one accident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    /// Bounds the summary was computed for.
    pub bounds: FilterBounds,
    /// Number of accidents in the selection.
    pub count: u64,
    /// Accidents per day phase.
    pub phases: Vec<PhaseCount>,
    /// Most frequent causes, descending.
    pub causes: Vec<CauseCount>,
    /// Map points for accidents with coordinates.
    pub points: Vec<GeoPoint>,
}
