#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the accident dashboard.
//!
//! Summarizes a period straight to the terminal, prints the loaded date
//! range, or starts the API server. Run without a subcommand for an
//! interactive menu.
//!
//! Uses `indicatif-log-bridge` (via [`accident_map_cli_utils::init_logger`])
//! so that log lines and the load progress bar never fight for the
//! terminal.

mod interactive;
mod report;

use std::path::PathBuf;

use accident_map_analytics::summarize;
use accident_map_analytics_models::{FilterBounds, OverflowPolicy};
use accident_map_cli_utils::{LoadProgress, MultiProgress};
use accident_map_config::DashboardConfig;
use accident_map_source::parsing::parse_time_of_day;
use accident_map_source::{Dataset, SourceError};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "accident_map", about = "Highway accident dashboard toolkit")]
struct Cli {
    /// Accident spreadsheet (overrides `ACCIDENT_MAP_DATA` and `dashboard.toml`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize accidents within a date and time-of-day range
    Summary {
        /// First date included (YYYY-MM-DD). Defaults to the earliest record.
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last date included (YYYY-MM-DD). Defaults to the latest record.
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Earliest time-of-day included (HH:MM[:SS])
        #[arg(long, value_parser = parse_time_arg, default_value = "00:00")]
        time_from: NaiveTime,
        /// Latest time-of-day included (HH:MM[:SS])
        #[arg(long, value_parser = parse_time_arg, default_value = "23:59")]
        time_to: NaiveTime,
        /// Number of causes to rank (overrides the configured cutoff)
        #[arg(long)]
        top_n: Option<usize>,
        /// Sum causes below the cutoff into an "other" entry instead of
        /// dropping them
        #[arg(long)]
        merge_overflow: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the loaded date range and record count
    Bounds,
    /// Start the API server
    Serve,
}

fn parse_time_arg(value: &str) -> Result<NaiveTime, String> {
    parse_time_of_day(value).ok_or_else(|| format!("invalid time '{value}', expected HH:MM[:SS]"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = accident_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = DashboardConfig::load()?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let Some(command) = cli.command else {
        return interactive::run(&multi, config);
    };

    match command {
        Commands::Summary {
            from,
            to,
            time_from,
            time_to,
            top_n,
            merge_overflow,
            json,
        } => {
            if let Some(top_n) = top_n {
                config.causes.top_n = top_n;
            }
            if merge_overflow {
                config.causes.overflow_policy = OverflowPolicy::Merge;
            }

            let dataset = load_dataset(&multi, &config)?;
            let Some((min_date, max_date)) = dataset.date_range() else {
                println!("{}", report::render_bounds(&dataset));
                return Ok(());
            };

            let bounds = FilterBounds {
                date_from: from.unwrap_or(min_date),
                date_to: to.unwrap_or(max_date),
                time_from,
                time_to,
            };
            if bounds.is_wrapping() {
                log::warn!(
                    "Time range {}-{} does not wrap past midnight and matches nothing",
                    bounds.time_from,
                    bounds.time_to
                );
            }
            let summary = summarize(dataset.records(), &bounds, &config.causes);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render_summary(&summary));
            }
        }
        Commands::Bounds => {
            let dataset = load_dataset(&multi, &config)?;
            println!("{}", report::render_bounds(&dataset));
        }
        Commands::Serve => serve(config)?,
    }

    Ok(())
}

/// Loads the configured dataset with a progress bar.
///
/// Each invocation runs one command and reads the source once.
fn load_dataset(multi: &MultiProgress, config: &DashboardConfig) -> Result<Dataset, SourceError> {
    log::debug!("Using accident data at {}", config.data_path.display());
    let message = format!("Reading {}", config.data_path.display());
    let progress = LoadProgress::rows_bar(multi, &message);
    accident_map_source::load_with_progress(&config.data_path, &progress)
}

/// Runs the API server on a dedicated actix system.
fn serve(config: DashboardConfig) -> Result<(), accident_map_server::ServerError> {
    actix_web::rt::System::new().block_on(accident_map_server::run_server(config))
}
