//! Interactive mode for the server.
//!
//! Prompts for the data file, bind address and port before starting the
//! server.

use std::path::PathBuf;

use accident_map_config::DashboardConfig;
use dialoguer::{Confirm, Input};

use crate::ServerError;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Starts from `config` and lets the user override the data path, bind
/// address and port before delegating to [`super::run_server`].
///
/// # Errors
///
/// Returns [`ServerError`] if the dataset cannot be loaded or the server
/// fails to start.
#[allow(clippy::future_not_send)]
pub async fn run(mut config: DashboardConfig) -> Result<(), ServerError> {
    println!("Accident Dashboard Server");
    println!();

    let default_path = config.data_path.display().to_string();
    let data_path: String = Input::new()
        .with_prompt("Accident spreadsheet")
        .default(default_path.clone())
        .interact_text()
        .unwrap_or(default_path);
    config.data_path = PathBuf::from(data_path);

    let default_addr = config.server.bind_addr.clone();
    config.server.bind_addr = Input::new()
        .with_prompt("Bind address")
        .default(default_addr.clone())
        .interact_text()
        .unwrap_or(default_addr);

    let default_port = config.server.port;
    config.server.port = Input::new()
        .with_prompt("Port")
        .default(default_port)
        .interact_text()
        .unwrap_or(default_port);

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {}:{}?",
            config.server.bind_addr, config.server.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}
