//! Duel driver - self-play runner for the card duel
//!
//! Plays complete duels, draft included, with an anytime UCT search choosing
//! every move for both players:
//! 1. Loads settings from config.toml, environment and CLI
//! 2. Runs the configured number of episodes on a blocking worker
//! 3. Logs each outcome and the run summary
//!
//! Ctrl-C cancels the search in progress; the driver still answers with the
//! statistics gathered so far.

use anyhow::{Context, Result};
use clap::Parser;
use mcts::CancelToken;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod driver;
mod stats;

use crate::config::Config;
use crate::driver::Driver;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");
    // The central config is loaded while parsing arguments, before tracing
    crate::config::log_config_source();

    let cancel = CancelToken::new();
    let driver = match Driver::new(config, cancel.clone()) {
        Ok(driver) => driver,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return Err(e);
        }
    };

    // Setup graceful shutdown
    let shutdown_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, stopping driver...");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to listen for ctrl+c: {}", e),
        }
    });

    // Search is CPU bound, keep it off the async workers
    let run_result = tokio::task::spawn_blocking(move || driver.run())
        .await
        .context("driver task panicked")
        .and_then(|result| result);

    shutdown_handle.abort();

    match run_result {
        Ok(()) => {
            info!("Driver completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Driver failed: {:#}", e);
            Err(e)
        }
    }
}
