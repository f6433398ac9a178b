//! Interactive menu shown when no subcommand is given.

use accident_map_analytics::summarize;
use accident_map_analytics_models::{FilterBounds, default_time_from, default_time_to};
use accident_map_cli_utils::MultiProgress;
use accident_map_config::DashboardConfig;
use accident_map_source::parsing::parse_time_of_day;
use chrono::{NaiveDate, NaiveTime};
use dialoguer::{Input, Select};

use crate::report;

/// Top-level actions offered by the menu.
enum Action {
    Summarize,
    Bounds,
    Serve,
}

impl Action {
    const ALL: &[Self] = &[Self::Summarize, Self::Bounds, Self::Serve];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Summarize => "Summarize a period",
            Self::Bounds => "Show dataset date range",
            Self::Serve => "Start server",
        }
    }
}

/// Prompts for an action and runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails, the dataset cannot be loaded, or
/// the server fails to start.
pub fn run(multi: &MultiProgress, config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Highway Accident Dashboard");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::Summarize => {
            let dataset = crate::load_dataset(multi, &config)?;
            let Some((min_date, max_date)) = dataset.date_range() else {
                println!("{}", report::render_bounds(&dataset));
                return Ok(());
            };

            let bounds = FilterBounds {
                date_from: prompt_date("Start date", min_date)?,
                date_to: prompt_date("End date", max_date)?,
                time_from: prompt_time("Start time", default_time_from())?,
                time_to: prompt_time("End time", default_time_to())?,
            };

            let summary = summarize(dataset.records(), &bounds, &config.causes);
            println!();
            print!("{}", report::render_summary(&summary));
        }
        Action::Bounds => {
            let dataset = crate::load_dataset(multi, &config)?;
            println!("{}", report::render_bounds(&dataset));
        }
        Action::Serve => actix_web::rt::System::new()
            .block_on(accident_map_server::interactive::run(config))?,
    }

    Ok(())
}

fn prompt_date(prompt: &str, default: NaiveDate) -> Result<NaiveDate, dialoguer::Error> {
    let value: String = Input::new()
        .with_prompt(format!("{prompt} (YYYY-MM-DD)"))
        .default(default.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()?;

    Ok(NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").unwrap_or(default))
}

fn prompt_time(prompt: &str, default: NaiveTime) -> Result<NaiveTime, dialoguer::Error> {
    let value: String = Input::new()
        .with_prompt(format!("{prompt} (HH:MM)"))
        .default(default.format("%H:%M").to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            parse_time_of_day(input)
                .map(|_| ())
                .ok_or_else(|| "expected HH:MM".to_string())
        })
        .interact_text()?;

    Ok(parse_time_of_day(&value).unwrap_or(default))
}
