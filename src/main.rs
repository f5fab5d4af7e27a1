//! Thames Tides - interpolate tidal heights for Thames gauges
//!
//! Reads query timestamps from a file, makes sure the PLA predictions for
//! every quarter involved are cached, and writes one interpolated height per
//! timestamp.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use thames_tides::cache::CacheStore;
use thames_tides::cli::{Cli, RunConfig};
use thames_tides::data::{all_sites, PlaClient};
use thames_tides::output::{format_row, write_results};
use thames_tides::query::read_query_times;
use thames_tides::TideClient;

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.list_sites {
        for site in all_sites() {
            println!("{:<6} {}", site.code, site.name);
        }
        return Ok(());
    }

    let config = RunConfig::from_cli(&cli)?;

    if cli.wipe_cache {
        let mut cache = CacheStore::open(&config.cache_dir)?;
        if cache.wipe()? {
            println!("Cache deleted");
        }
        return Ok(());
    }

    let times = read_query_times(&config.input)?;
    info!(count = times.len(), input = %config.input.display(), "read query times");

    let cache = CacheStore::open(&config.cache_dir)?;
    let remote = PlaClient::new(config.timeout)?;
    let mut client = TideClient::new(config.site, cache, remote).with_edge_policy(config.edge);
    let results = client.heights_at(&times).await?;

    if !config.silent {
        for (time, height) in &results {
            println!("{}", format_row(time, *height));
        }
    }
    write_results(&config.output, &results)?;
    info!(output = %config.output.display(), rows = results.len(), "wrote results");

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
