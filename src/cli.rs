//! Command-line interface parsing for the Pokedex REPL
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a validated `StartupConfig`, so bad settings are reported before the
//! REPL starts rather than on the first request.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::api::{ClientConfig, DEFAULT_BASE_URL};

/// Error types for CLI argument validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// The cache interval must be greater than zero
    #[error("Invalid cache interval: '{0}'. The interval must be at least 1 second")]
    InvalidCacheInterval(u64),

    /// The request timeout must be greater than zero
    #[error("Invalid timeout: '{0}'. The timeout must be at least 1 second")]
    InvalidTimeout(u64),

    /// The base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}

/// Pokedex - explore PokeAPI location areas and catch Pokemon
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Interactive Pokedex backed by PokeAPI")]
#[command(version)]
pub struct Cli {
    /// How long API responses stay cached, in seconds
    ///
    /// Also the period of the background sweep that removes stale entries.
    #[arg(long, value_name = "SECONDS", default_value_t = 300)]
    pub cache_interval_secs: u64,

    /// HTTP request timeout, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 5)]
    pub timeout_secs: u64,

    /// PokeAPI root URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log debug output (cache hits, misses, sweeps) to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// Settings for the PokeAPI client and its cache
    pub client: ClientConfig,
    /// Whether debug logging is enabled
    pub verbose: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if an interval is zero or the URL is not http(s)
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.cache_interval_secs == 0 {
            return Err(CliError::InvalidCacheInterval(cli.cache_interval_secs));
        }
        if cli.timeout_secs == 0 {
            return Err(CliError::InvalidTimeout(cli.timeout_secs));
        }
        if !(cli.base_url.starts_with("http://") || cli.base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }

        Ok(StartupConfig {
            client: ClientConfig {
                base_url: cli.base_url.clone(),
                timeout: Duration::from_secs(cli.timeout_secs),
                cache_interval: Duration::from_secs(cli.cache_interval_secs),
            },
            verbose: cli.verbose,
        })
    }

    /// The default log filter for this configuration (overridden by `RUST_LOG`)
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "pokedex=debug,warn"
        } else {
            "warn"
        }
    }
}
