#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the accident map binaries.
//!
//! [`LoadProgress`] shows the spreadsheet load: a spinner with elapsed time
//! while the workbook is parsed (calamine reads the whole sheet before any
//! row is known), then a row counter once normalization starts.
//! [`init_logger`] routes `log` output through `indicatif-log-bridge` so
//! log lines print above the bar instead of through it.

use std::sync::Arc;
use std::time::Duration;

use accident_map_source::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg} [{elapsed}]";
const ROWS_TEMPLATE: &str =
    "  {msg} {wide_bar:.cyan/dim} {human_pos}/{human_len} rows {percent}% [{eta}]";

/// Load progress for one accident source file.
pub struct LoadProgress {
    bar: ProgressBar,
    rows_style: ProgressStyle,
}

impl LoadProgress {
    /// Adds a load indicator for the file being read to `multi`.
    #[must_use]
    pub fn rows_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(120));
        Arc::new(Self::with_bar(bar, message))
    }

    fn with_bar(bar: ProgressBar, message: &str) -> Self {
        bar.set_style(
            ProgressStyle::with_template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        let rows_style = ProgressStyle::with_template(ROWS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        Self { bar, rows_style }
    }
}

impl ProgressCallback for LoadProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.rows_style.clone());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        log::debug!("{msg} in {:.1?}", self.bar.elapsed());
        self.bar.finish_with_message(msg);
    }
}

/// Installs the `pretty_env_logger` formatter behind `indicatif-log-bridge`.
///
/// The level defaults to `info`; `RUST_LOG` refines it. Every progress bar
/// must be added to the returned [`MultiProgress`].
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // A logger may already be installed when running under a test harness
    let _ = indicatif_log_bridge::LogWrapper::new(multi.clone(), logger).try_init();
    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use super::*;

    use indicatif::ProgressDrawTarget;

    fn hidden_spinner() -> ProgressBar {
        ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
    }

    #[test]
    fn switches_to_row_counter_once_total_is_known() {
        let progress = LoadProgress::with_bar(hidden_spinner(), "Reading accidents.xlsx");
        assert_eq!(progress.bar.length(), None);

        progress.set_total(25_000);
        progress.inc(10_000);
        progress.inc(10_000);
        progress.inc(5_000);

        assert_eq!(progress.bar.length(), Some(25_000));
        assert_eq!(progress.bar.position(), 25_000);
    }

    #[test]
    fn finish_keeps_final_message() {
        let progress = LoadProgress::with_bar(hidden_spinner(), "Reading accidents.csv");
        progress.set_total(3);
        progress.inc(3);
        progress.finish("Normalized 3 accident records".to_string());

        assert!(progress.bar.is_finished());
        assert_eq!(progress.bar.message(), "Normalized 3 accident records");
    }
}
