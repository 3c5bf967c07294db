//! `facerig`: headless stage host.
//!
//! Connects to a tracking feed, drives a [`stage::session::Session`] against
//! an in-memory rig at a fixed tick rate, and prints a JSON run summary on
//! exit. Useful for checking a tracker end to end without a browser.
//!
//! Exit status is non-zero when the configuration is invalid, the feed cannot
//! be reached, or the feed drops mid-run.

mod config;
mod error;
mod headless;
mod runner;

use std::process::ExitCode;

use clap::Parser;

use crate::config::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "invalid configuration");
            return ExitCode::from(2);
        }
    };

    let summary = match runner::run(&config).await {
        Ok(summary) => summary,
        Err(error) => {
            tracing::error!(%error, "run failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(rendered) => println!("{rendered}"),
        Err(error) => tracing::error!(%error, "failed to encode run summary"),
    }

    if summary.connection_lost() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
