//! Plain-text rendering of period summaries.

use std::fmt::Write as _;

use accident_map_analytics_models::PeriodSummary;
use accident_map_source::Dataset;

const LABEL_WIDTH: usize = 40;

/// Renders the record counter, the day-phase histogram and the cause
/// ranking as aligned text tables.
#[must_use]
pub fn render_summary(summary: &PeriodSummary) -> String {
    let bounds = &summary.bounds;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Period: {} to {}, {} to {}",
        bounds.date_from, bounds.date_to, bounds.time_from, bounds.time_to
    );
    if bounds.is_wrapping() {
        let _ = writeln!(
            out,
            "Note: the time range does not wrap past midnight, so it matches nothing"
        );
    }
    let _ = writeln!(out, "Accidents in period: {}", summary.count);
    let _ = writeln!(out, "Mapped locations: {}", summary.points.len());

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<LABEL_WIDTH$} COUNT", "DAY PHASE");
    let _ = writeln!(out, "{}", "-".repeat(LABEL_WIDTH + 6));
    for phase in &summary.phases {
        let _ = writeln!(out, "{:<LABEL_WIDTH$} {}", phase.phase, phase.count);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<LABEL_WIDTH$} COUNT", "CAUSE");
    let _ = writeln!(out, "{}", "-".repeat(LABEL_WIDTH + 6));
    for cause in &summary.causes {
        let _ = writeln!(out, "{:<LABEL_WIDTH$} {}", cause.cause, cause.count);
    }

    out
}

/// Renders the loaded date range and record count.
#[must_use]
pub fn render_bounds(dataset: &Dataset) -> String {
    dataset.date_range().map_or_else(
        || "No accident records loaded".to_string(),
        |(min, max)| format!("{} accident records from {min} to {max}", dataset.len()),
    )
}
