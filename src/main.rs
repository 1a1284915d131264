//! Docsweep main entry point
//!
//! This is the command-line interface for the Docsweep coverage auditor.

use anyhow::Context;
use clap::Parser;
use docsweep::config::{load_config_with_hash, Config};
use docsweep::coverage::{compare_files, CoverageReport};
use docsweep::crawler::{Coordinator, LogObserver};
use docsweep::output::{
    format_coverage_report, write_reports, JsonReportWriter, ReportSink,
};
use docsweep::url::ScopeFilter;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Page ceiling used by --quick
const QUICK_AUDIT_PAGES: usize = 50;

/// Docsweep: a documentation-site coverage auditor
///
/// Docsweep crawls one documentation site breadth-first, records every page
/// and the API routes documented on it, and writes a coverage baseline that
/// another scraper's output can be compared against.
#[derive(Parser, Debug)]
#[command(name = "docsweep")]
#[command(version = "1.0.0")]
#[command(about = "A documentation-site coverage auditor", long_about = None)]
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

    /// Stop after this many recorded pages (overrides the config)
    #[arg(long, value_name = "N", conflicts_with = "quick")]
    max_pages: Option<usize>,

    /// Quick audit: stop after 50 recorded pages
    #[arg(long)]
    quick: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "compare_only")]
    dry_run: bool,

    /// Compare the existing baseline with the app metadata file and exit
    #[arg(long, conflicts_with = "dry_run")]
    compare_only: bool,
}

impl Cli {
    fn page_ceiling(&self, config: &Config) -> Option<usize> {
        if self.quick {
            Some(QUICK_AUDIT_PAGES)
        } else {
            self.max_pages.or(config.crawler.max_pages)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, cli.page_ceiling(&config))
    } else if cli.compare_only {
        let report = handle_compare(&config)?;
        JsonReportWriter::new(&config.output.directory).write_comparison(&report)?;
        Ok(())
    } else {
        handle_crawl(&config, cli.page_ceiling(&config), config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docsweep=info,warn"),
            1 => EnvFilter::new("docsweep=debug,info"),
            2 => EnvFilter::new("docsweep=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, max_pages: Option<usize>) -> anyhow::Result<()> {
    let scope = ScopeFilter::from_config(config)?;

    println!("=== Docsweep Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", config.crawler.base_url);
    println!("  Host in scope: {}", scope.host());
    match max_pages {
        Some(limit) => println!("  Page limit: {}", limit),
        None => println!("  Page limit: none"),
    }
    println!("  Crawl delay: {}ms", config.crawler.crawl_delay_ms);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!(
        "  Minimum content length: {} chars",
        config.crawler.min_content_length
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nExtraction:");
    println!("  Route prefix: {}", config.extraction.route_prefix);
    println!(
        "  Skipped extensions: {}",
        config.extraction.skip_extensions.join(", ")
    );
    println!("  Skipped paths: {}", config.extraction.skip_paths.join(", "));

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Baseline: {}", config.output.baseline_path().display());
    println!("  App metadata: {}", config.output.app_metadata.display());

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --compare-only mode and the comparison after a crawl
fn handle_compare(config: &Config) -> anyhow::Result<CoverageReport> {
    let report = compare_files(&config.output.baseline_path(), &config.output.app_metadata)?;
    println!("\n{}\n", format_coverage_report(&report));
    Ok(report)
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    max_pages: Option<usize>,
    config_hash: String,
) -> anyhow::Result<()> {
    let coordinator = Coordinator::from_config(config)?
        .with_max_pages(max_pages)
        .with_observer(LogObserver);

    let stop = coordinator.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            stop.store(true, Ordering::SeqCst);
        }
    });

    let result = coordinator.run().await.context("Crawl failed")?;

    if !result.reconciles() {
        tracing::warn!(
            "Visited count {} does not match recorded outcomes",
            result.visited
        );
    }

    let writer = JsonReportWriter::new(&config.output.directory);
    let paths = write_reports(&writer, &result, writer.timestamp(), Some(config_hash))
        .context("Failed to write reports")?;
    tracing::info!("Audit complete, reports in {}", config.output.directory.display());
    tracing::debug!("Report files: {:?}", paths);

    if config.output.app_metadata.exists() {
        match handle_compare(config) {
            Ok(report) => writer.write_comparison(&report)?,
            Err(e) => tracing::error!("Comparison failed: {:#}", e),
        }
    } else {
        tracing::info!(
            "No app metadata at {}, skipping comparison",
            config.output.app_metadata.display()
        );
    }

    Ok(())
}
