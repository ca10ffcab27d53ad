//! Index-Courier main entry point
//!
//! This is the command-line interface for submitting URLs to search-engine
//! indexing services and inspecting the submission history.

use anyhow::{bail, Context};
use clap::Parser;
use index_courier::config::{load_config_with_hash, load_vendor_credentials, Config};
use index_courier::output::{
    format_dry_run, load_statistics, print_batch_report, print_history, print_statistics,
};
use index_courier::storage::{SqliteStorage, Storage};
use index_courier::submit::{BatchRequest, BatchRunner, SubmissionPlan};
use index_courier::url::{extract_urls_from_file, validate_unique_urls, validate_urls};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Index-Courier: search-engine URL submission
///
/// Submits URLs through the Google Indexing API and the IndexNow protocol,
/// records every outcome, and serves the same pipeline over HTTP.
#[derive(Parser, Debug)]
#[command(name = "index-courier")]
#[command(version)]
#[command(about = "Submit URLs to search-engine indexing services", long_about = None)]
#[command(group(clap::ArgGroup::new("mode").multiple(false)))]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// URLs to submit
    #[arg(value_name = "URLS")]
    urls: Vec<String>,

    /// Read URLs from a file (.txt one per line, .html/.xml links, anything else scanned)
    #[arg(long, value_name = "PATH")]
    urls_file: Option<PathBuf>,

    /// IndexNow key, overriding the configuration
    #[arg(long, env = "INDEXNOW_API_KEY", hide_env_values = true)]
    indexnow_key: Option<String>,

    /// Service-account JSON for the Google Indexing API, overriding the configuration
    #[arg(long, value_name = "PATH")]
    credentials: Option<PathBuf>,

    /// Submit through the Google Indexing API as well
    #[arg(long)]
    use_vendor_api: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run the HTTP API on the configured bind address
    #[arg(long, group = "mode")]
    serve: bool,

    /// Show statistics from the history database and exit
    #[arg(long, group = "mode")]
    stats: bool,

    /// Show the N most recent submissions and exit
    #[arg(long, value_name = "N", num_args = 0..=1, default_missing_value = "20", group = "mode")]
    history: Option<usize>,

    /// Delete all stored history and exit
    #[arg(long, group = "mode")]
    clear_history: bool,

    /// Validate config and URLs and show which methods would run, without submitting
    #[arg(long, group = "mode")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(key) = &cli.indexnow_key {
        config.indexnow.key = Some(key.clone());
    }
    if let Some(path) = &cli.credentials {
        config.vendor.credentials_path = Some(path.display().to_string());
    }

    if cli.serve {
        index_courier::server::serve(&config, config_hash).await?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(limit) = cli.history {
        handle_history(&config, limit)?;
    } else if cli.clear_history {
        handle_clear_history(&config)?;
    } else if cli.dry_run {
        handle_dry_run(&cli, &config)?;
    } else {
        handle_submit(&cli, &config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("index_courier=info,warn"),
            1 => EnvFilter::new("index_courier=debug,tower_http=debug,info"),
            2 => EnvFilter::new("index_courier=trace,debug"),
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

/// Collects candidate URLs from the arguments and the optional URL file
fn collect_candidates(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut candidates = cli.urls.clone();

    if let Some(path) = &cli.urls_file {
        let (kind, extracted) = extract_urls_from_file(path)
            .with_context(|| format!("Failed to read URLs from {}", path.display()))?;
        tracing::debug!("Read {} candidates from {}", extracted.len(), path.display());

        if kind.deduplicates() {
            candidates.extend(validate_unique_urls(&extracted));
        } else {
            candidates.extend(extracted);
        }
    }

    Ok(candidates)
}

fn load_credentials(config: &Config) -> anyhow::Result<Option<serde_json::Value>> {
    match &config.vendor.credentials_path {
        Some(path) => {
            let credentials = load_vendor_credentials(Path::new(path))?;
            Ok(Some(credentials.as_value().clone()))
        }
        None => Ok(None),
    }
}

/// Handles the default mode: submits every URL and records the batch
async fn handle_submit(cli: &Cli, config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let urls = collect_candidates(cli)?;
    if urls.is_empty() {
        bail!("No URLs given; pass them as arguments or with --urls-file");
    }

    let request = BatchRequest {
        urls,
        use_vendor_api: cli.use_vendor_api,
        vendor_credentials: load_credentials(config)?,
        protocol_key: config.indexnow.key.clone(),
    };

    let runner = BatchRunner::from_config(config).context("Failed to build HTTP client")?;
    let report = runner.submit(request).await?;

    print_batch_report(&report);

    match SqliteStorage::new(Path::new(&config.output.database_path))
        .and_then(|mut storage| storage.record_batch(config_hash, &report))
    {
        Ok(batch_id) => tracing::info!("Recorded batch {}", batch_id),
        Err(e) => tracing::warn!("Failed to save results to history: {}", e),
    }

    Ok(())
}

/// Handles the --dry-run mode: validates URLs and shows what would run
fn handle_dry_run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    println!("=== Index-Courier Dry Run ===\n");

    println!("IndexNow engines ({}):", config.indexnow.engines.len());
    for engine in &config.indexnow.engines {
        println!("  - {} ({})", engine.name, engine.endpoint);
    }
    println!("  POST endpoint: {}", config.indexnow.post_endpoint);
    println!("\nPacing: {}ms between URLs", config.submission.pacing_delay_ms);
    println!("Database: {}\n", config.output.database_path);

    let urls = validate_urls(&collect_candidates(cli)?);
    let plan = SubmissionPlan {
        use_vendor_api: cli.use_vendor_api,
        vendor_credentials: load_credentials(config)?
            .map(index_courier::submit::VendorCredentials::new),
        protocol_key: config.indexnow.key.clone(),
    };

    print!("{}", format_dry_run(&urls, &plan));
    println!("\n✓ Configuration is valid");
    if urls.is_empty() {
        println!("✗ No valid URLs provided (must start with http:// or https://)");
    }

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --history mode: lists the most recent submissions
fn handle_history(config: &Config, limit: usize) -> anyhow::Result<()> {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let records = storage.read_history(limit)?;
    print_history(&records);

    Ok(())
}

/// Handles the --clear-history mode
fn handle_clear_history(config: &Config) -> anyhow::Result<()> {
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let removed = storage.clear_history()?;
    println!("✓ Removed {} history records", removed);

    Ok(())
}
