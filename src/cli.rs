//! Command-line interface parsing for Thames Tides
//!
//! This module handles parsing of CLI arguments using clap and resolving them
//! into a validated `RunConfig`: the site is looked up in the gauge registry
//! and the cache directory defaults to the per-user cache location.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use directories::ProjectDirs;
use thiserror::Error;

use crate::data::{site_by_name, EdgePolicy, Site};

/// Cache directory used when no per-user location can be determined
const FALLBACK_CACHE_DIR: &str = "./.cache";

/// Error types for CLI argument resolution
#[derive(Debug, Error)]
pub enum CliError {
    /// The site name is not in the gauge registry
    #[error("Site '{0}' not found in the tidal gauge registry")]
    UnknownSite(String),

    /// The request timeout must be positive
    #[error("Invalid timeout: {0}s. The timeout must be at least 1 second")]
    InvalidTimeout(u64),
}

/// Thames Tides - interpolate tidal heights from PLA predictions
#[derive(Parser, Debug)]
#[command(name = "thames-tides")]
#[command(about = "Interpolate Thames tidal heights at given times")]
#[command(version)]
pub struct Cli {
    /// File with one timestamp per line, e.g. 2021-02-12T10:01:01.000Z
    #[arg(long, default_value = "input.txt")]
    pub input: PathBuf,

    /// File to write results to
    #[arg(long, default_value = "output.txt")]
    pub output: PathBuf,

    /// Tidal gauge name. See --list-sites for options
    #[arg(long, default_value = "Chelsea Bridge")]
    pub site: String,

    /// Cache directory [default: per-user cache directory]
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Handling of times outside the known data: clamp, extrapolate or error
    #[arg(long, default_value = "clamp")]
    pub edge: EdgePolicy,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Suppress output to console
    #[arg(long)]
    pub silent: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the known tidal gauges and exit
    #[arg(long)]
    pub list_sites: bool,

    /// Delete the cache directory (asks for confirmation) and exit
    #[arg(long)]
    pub wipe_cache: bool,
}

/// Settings for one run, derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub site: &'static Site,
    pub cache_dir: PathBuf,
    pub edge: EdgePolicy,
    pub timeout: Duration,
    pub silent: bool,
}

/// Per-user cache directory, e.g. `~/.cache/thames-tides/` on Linux
pub fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", "thames-tides")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with the site resolved
    /// * `Err(CliError)` if the site is unknown or the timeout is zero
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let site =
            site_by_name(&cli.site).map_err(|_| CliError::UnknownSite(cli.site.clone()))?;
        if cli.timeout == 0 {
            return Err(CliError::InvalidTimeout(cli.timeout));
        }

        Ok(RunConfig {
            input: cli.input.clone(),
            output: cli.output.clone(),
            site,
            cache_dir: cli.cache.clone().unwrap_or_else(default_cache_dir),
            edge: cli.edge,
            timeout: Duration::from_secs(cli.timeout),
            silent: cli.silent,
        })
    }
}
