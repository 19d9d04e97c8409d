//! Link-Patrol main entry point
//!
//! This is the command-line interface for the Link-Patrol broken link finder.

use clap::Parser;
use link_patrol::config::{load_config_with_hash, Config};
use link_patrol::crawler::crawl;
use link_patrol::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Link-Patrol: a same-site broken link finder
///
/// Link-Patrol starts at a seed address, follows every link that stays on
/// the seed's hostname, and reports each destination that answered with an
/// HTTP error or could not be reached, together with the page linking to it.
#[derive(Parser, Debug)]
#[command(name = "link-patrol")]
#[command(version)]
#[command(about = "A same-site broken link finder", long_about = None)]
struct Cli {
    /// Address to start crawling from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Append errors to this file instead of the configured error log
    #[arg(long, value_name = "PATH")]
    error_log: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if let Some(path) = cli.error_log {
        config.output.error_log_path = path.display().to_string();
    }

    println!("Starting crawler...");
    tracing::info!("Errors will be appended to {}", config.output.error_log_path);

    let outcome = match crawl(&config, &cli.seed).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    println!("Crawling complete!\n");
    print_report(&outcome);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_patrol=info,warn"),
            1 => EnvFilter::new("link_patrol=debug,info"),
            2 => EnvFilter::new("link_patrol=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
