//! Sumi-Indexer main entry point
//!
//! This is the command-line interface for the Sumi-Indexer crawler.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sumi_indexer::config::{load_config_with_hash, resolve_config, validate_domain, Config};
use sumi_indexer::crawler::{read_domain_list, BatchRunner, Crawler};
use sumi_indexer::output::{load_statistics, print_batch_summary, print_statistics};
use sumi_indexer::storage::{SqliteStorage, Storage};
use tracing_subscriber::EnvFilter;

/// Sumi-Indexer: a robots-aware crawler that builds an inverted index
///
/// Sumi-Indexer crawls a domain to a bounded link depth, honours the
/// wildcard robots.txt group, and records stemmed term frequencies for
/// every page in a SQLite index.
#[derive(Parser, Debug)]
#[command(name = "sumi-indexer")]
#[command(version)]
#[command(about = "A robots-aware crawler that builds an inverted index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl and index one domain, or every domain listed in a file
    Scrape {
        /// Domain to crawl, e.g. example.com
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        domain: Option<String>,

        /// Newline-delimited list of domains, crawled one after another
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Show statistics from the index database and exit
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    match cli.command {
        Command::Scrape { domain, file } => handle_scrape(&config, domain, file).await,
        Command::Stats => handle_stats(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_indexer=info,warn"),
            1 => EnvFilter::new("sumi_indexer=debug,info"),
            2 => EnvFilter::new("sumi_indexer=trace,debug"),
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

/// Loads the configuration file (if any) and the environment overlay
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => resolve_config(None).context("failed to load configuration from the environment"),
    }
}

/// Opens the index database and verifies the connection
fn open_storage(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = Path::new(&config.database.path);
    let storage = SqliteStorage::new(path)
        .with_context(|| format!("failed to open database {}", path.display()))?;
    storage
        .ping()
        .with_context(|| format!("database {} is not usable", path.display()))?;
    tracing::debug!("Database ready at {}", path.display());
    Ok(storage)
}

/// Handles the scrape subcommand
async fn handle_scrape(
    config: &Config,
    domain: Option<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let domains = match (domain, file) {
        (Some(domain), None) => {
            validate_domain(&domain).with_context(|| format!("cannot crawl '{}'", domain))?;
            vec![domain]
        }
        (None, Some(file)) => read_domain_list(&file)
            .with_context(|| format!("failed to read domain list {}", file.display()))?,
        _ => bail!("expected exactly one of <DOMAIN> or --file"),
    };

    let storage = Arc::new(Mutex::new(open_storage(config)?));
    let crawler = Crawler::new(config, storage).context("failed to build HTTP client")?;

    tracing::info!(
        "Crawling {} domain(s) to depth {}",
        domains.len(),
        config.crawler.max_depth
    );

    let runner = BatchRunner::new(crawler);
    let batch = runner.run(&domains).await;
    print_batch_summary(&batch);

    Ok(())
}

/// Handles the stats subcommand
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.database.path);

    let storage = open_storage(config)?;
    let stats = load_statistics(&storage).context("failed to query statistics")?;
    print_statistics(&stats);

    Ok(())
}
