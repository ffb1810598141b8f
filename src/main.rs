//! Pinscout main entry point
//!
//! This is the command-line interface for the Pinscout pin board scraper.

use clap::Parser;
use pinscout::config::load_config;
use pinscout::crawler::run_pipeline;
use pinscout::sink::{destination_for, Stage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pinscout: a keyword-driven pin board scraper
///
/// Pinscout crawls keyword search results into per-keyword CSV files, then
/// revisits each discovered detail page for enriched creator attributes.
/// Fetches can be routed through a rotating-proxy service and every fetch is
/// wrapped in bounded retries.
#[derive(Parser, Debug)]
#[command(name = "pinscout")]
#[command(version = "1.0.0")]
#[command(about = "A keyword-driven pin board scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_scrape(config).await?;
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
            0 => EnvFilter::new("pinscout=info,warn"),
            1 => EnvFilter::new("pinscout=debug,info"),
            2 => EnvFilter::new("pinscout=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &pinscout::config::Config) {
    println!("=== Pinscout Dry Run ===\n");

    println!("Crawl Configuration:");
    println!("  Site root: {}", config.crawl.site_root);
    println!("  Locale: {}", config.crawl.locale);
    println!("  Retries per fetch: {}", config.crawl.retries);
    println!(
        "  Detail timeout: {}s",
        config.crawl.detail_timeout_secs
    );
    match config.crawl.search_timeout_secs {
        Some(secs) => println!("  Search timeout: {}s", secs),
        None => println!("  Search timeout: client default"),
    }

    println!("\nProxy:");
    match &config.proxy {
        Some(proxy) => println!("  Relay endpoint: {}", proxy.endpoint),
        None => println!("  Disabled (fetching directly)"),
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Failure snapshot: {}", config.output.snapshot_filename);

    println!("\nKeywords ({}):", config.crawl.keywords.len());
    for keyword in &config.crawl.keywords {
        println!(
            "  - {} -> {}, {}",
            keyword,
            destination_for(keyword, Stage::Search),
            destination_for(keyword, Stage::Detail)
        );
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would scrape {} keyword(s)",
        config.crawl.keywords.len()
    );
}

/// Handles the main scrape operation
async fn handle_scrape(config: pinscout::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Starting pipeline: {} keyword(s), proxy {}",
        config.crawl.keywords.len(),
        if config.proxy.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );

    match run_pipeline(config).await {
        Ok(()) => {
            tracing::info!("Pipeline completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Pipeline failed: {}", e);
            Err(e.into())
        }
    }
}
