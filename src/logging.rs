//! Tracing subscriber setup

use anyhow::{Result, anyhow};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Build the level filter: `--verbose` wins, then `RUST_LOG`, then the config.
pub fn build_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber. Must be called once, before any logging.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let (json, pretty) = if config.format == "json" {
        (
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            ),
            None,
        )
    } else {
        (
            None,
            Some(fmt::layer().with_target(false).with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(build_filter(config, verbose))
        .with(json)
        .with(pretty)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
