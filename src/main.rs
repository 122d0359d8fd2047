//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geoip_enrich` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use geoip_enrich::initialization::init_logger_with;
use geoip_enrich::{run_enrichment, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = match Config::try_from(Opt::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("geoip_enrich error: {}", e);
            process::exit(2);
        }
    };

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_enrichment(config).await {
        Ok(report) => {
            // stdout may hold the CSV, so the summary goes to stderr
            eprintln!("{}", report);
            Ok(())
        }
        Err(e) => {
            eprintln!("geoip_enrich error: {:#}", e);
            process::exit(1);
        }
    }
}
