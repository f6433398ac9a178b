#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Period filter and dashboard aggregations.
//!
//! [`filter::filter_period`] narrows the loaded records to a date and
//! time-of-day selection; the functions in [`aggregate`] reduce that
//! selection to the counter, the day-phase histogram, the cause ranking and
//! the map points. [`summarize`] runs the whole pass for one selection.
//!
//! Everything here is a pure function of its inputs. Nothing is cached
//! between calls.

pub mod aggregate;
pub mod filter;

use accident_map_accident_models::AccidentRecord;
use accident_map_analytics_models::{CauseRankingConfig, FilterBounds, PeriodSummary};

pub use aggregate::{cause_ranking, geo_projection, phase_histogram, record_count};
pub use filter::filter_period;

/// Filters `records` to `bounds` and computes every aggregation over the
/// selection.
#[must_use]
pub fn summarize(
    records: &[AccidentRecord],
    bounds: &FilterBounds,
    ranking: &CauseRankingConfig,
) -> PeriodSummary {
    let period = filter_period(records, bounds);

    log::debug!(
        "Selected {} of {} records for {}..={} {}..={}",
        period.len(),
        records.len(),
        bounds.date_from,
        bounds.date_to,
        bounds.time_from,
        bounds.time_to
    );

    PeriodSummary {
        bounds: *bounds,
        count: record_count(&period),
        phases: phase_histogram(&period),
        causes: cause_ranking(&period, ranking),
        points: geo_projection(&period),
    }
}
