//! Aquatrans main entry point
//!
//! Command-line interface for the aquatic market transaction crawler.

use anyhow::Context;
use aquatrans::config::CrawlConfig;
use aquatrans::crawler::Coordinator;
use aquatrans::query::DATA_ENDPOINT;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Taiwan aquatic market transaction crawler
///
/// Fetches one day of transaction data per date in the given range and
/// stores the parsed records in SQLite.
#[derive(Parser, Debug)]
#[command(name = "aquatrans")]
#[command(version)]
#[command(about = "Taiwan aquatic market transaction crawler", long_about = None)]
struct Cli {
    /// First date to fetch (YYYY-MM-DD)
    #[arg(value_name = "START_DATE")]
    start_date: NaiveDate,

    /// Last date to fetch, inclusive (YYYY-MM-DD)
    #[arg(value_name = "END_DATE")]
    end_date: NaiveDate,

    /// Limit concurrent connections
    #[arg(long = "max_tasks", value_name = "N", default_value_t = 10)]
    max_tasks: usize,

    /// Limit retries on network errors
    #[arg(long = "max_tries", value_name = "N", default_value_t = 4)]
    max_tries: u32,

    /// Path to the SQLite database file
    #[arg(long, value_name = "PATH", default_value = "tw-aquaculture-market.sqlite")]
    database: PathBuf,

    /// Override the data endpoint (e.g. to point at a mirror)
    #[arg(long, value_name = "URL", default_value = DATA_ENDPOINT)]
    endpoint: String,

    /// Log debug messages
    #[arg(short, long, conflicts_with_all = ["verbose", "quiet"])]
    debug: bool,

    /// Verbose logging
    #[arg(short, long, conflicts_with_all = ["debug", "quiet"])]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with_all = ["debug", "verbose"])]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug, cli.verbose, cli.quiet);

    let mut config = CrawlConfig::new(cli.start_date, cli.end_date);
    config.max_tasks = cli.max_tasks;
    config.max_tries = cli.max_tries;
    config.database_path = cli.database;
    config.endpoint = cli.endpoint;

    let mut coordinator = Coordinator::new(config).context("failed to initialize crawler")?;

    tokio::select! {
        result = coordinator.run() => {
            let report = result?;
            println!(
                "Fetched {} dates in {:.2?}: {} completed, {} failed, {} parse failures, {} dropped, {} records stored",
                report.items,
                report.elapsed,
                report.stats.completed,
                report.stats.failed,
                report.stats.parse_failures,
                report.stats.dropped,
                report.stats.records
            );
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\nInterrupted\n");
        }
    }

    // Both paths release the database handle before the process exits.
    coordinator.close()?;

    Ok(())
}

/// Sets up the tracing subscriber based on the verbosity flags
fn setup_logging(debug: bool, verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if debug {
        EnvFilter::new("aquatrans=trace,debug")
    } else if verbose {
        EnvFilter::new("aquatrans=debug,info")
    } else {
        EnvFilter::new("aquatrans=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
