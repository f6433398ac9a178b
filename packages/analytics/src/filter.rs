//! Period filter over loaded accident records.

use accident_map_accident_models::AccidentRecord;
use accident_map_analytics_models::FilterBounds;

/// Whether `record` falls inside `bounds`, all four bounds inclusive.
#[must_use]
pub fn matches(record: &AccidentRecord, bounds: &FilterBounds) -> bool {
    (bounds.date_from..=bounds.date_to).contains(&record.date)
        && (bounds.time_from..=bounds.time_to).contains(&record.time)
}

/// Returns copies of the records inside `bounds`, in input order.
///
/// Inverted date bounds or wrapping time bounds yield an empty selection;
/// an empty selection is a valid result, not an error.
#[must_use]
pub fn filter_period(records: &[AccidentRecord], bounds: &FilterBounds) -> Vec<AccidentRecord> {
    if bounds.is_wrapping() {
        log::debug!(
            "Time bounds {}-{} wrap past midnight; selection is empty",
            bounds.time_from,
            bounds.time_to
        );
    }

    records
        .iter()
        .filter(|r| matches(r, bounds))
        .cloned()
        .collect()
}
