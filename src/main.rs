//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl web crawler.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ripple_crawl::config::{
    effective_exclusions, load_config, validate, Config, FailurePolicy, ScopeMode, SeedSource,
    StateFormat,
};
use ripple_crawl::crawler::{CrawlEngine, EngineSettings, HttpFetcher, RunOutcome};
use ripple_crawl::output::{print_snapshot_report, print_statistics, read_output, CsvSink};
use ripple_crawl::storage::open_state_store;
use ripple_crawl::url::{PublicSuffixRegistry, Scoper};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a resumable breadth-first web crawler
///
/// Ripple-Crawl starts from a seed URL (or a file of them), follows every
/// link that survives the domain-exclusion and scope rules, and appends each
/// successfully fetched URL to a CSV file. Press Ctrl+C to stop; the frontier
/// is saved and the next run resumes from it.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version = "1.0.0")]
#[command(about = "A resumable breadth-first web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL", conflicts_with = "file")]
    url: Option<String>,

    /// File with one seed URL per line
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Number of concurrent workers
    #[arg(short, long, value_name = "N")]
    max_threads: Option<usize>,

    /// CSV file that receives crawled URLs
    #[arg(short, long, value_name = "PATH")]
    output_file: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Record only the fetched seed pages; do not follow links
    #[arg(long)]
    capture_main_only: bool,

    /// Collapse every discovered link to its registrable domain root
    #[arg(long)]
    capture_base_domain_only: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// File with extra excluded domains, one per line
    #[arg(long, value_name = "PATH")]
    ignore_file: Option<String>,

    /// Where the crawl state snapshot is kept
    #[arg(long, value_name = "PATH")]
    state_file: Option<String>,

    /// Snapshot encoding
    #[arg(long, value_enum)]
    state_format: Option<StateFormatArg>,

    /// Leave failed URLs unvisited so later links can retry them
    #[arg(long)]
    retry_failed: bool,

    /// Seconds in-flight fetches may run after Ctrl+C before the snapshot
    #[arg(long, value_name = "SECS")]
    shutdown_grace: Option<u64>,

    /// Save the snapshot every N crawled pages
    #[arg(long, value_name = "N")]
    checkpoint_every: Option<u64>,

    /// Discard any saved crawl state before starting
    #[arg(long)]
    fresh: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show the saved crawl state and output row count, then exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StateFormatArg {
    Sqlite,
    Json,
}

impl From<StateFormatArg> for StateFormat {
    fn from(arg: StateFormatArg) -> Self {
        match arg {
            StateFormatArg::Sqlite => StateFormat::Sqlite,
            StateFormatArg::Json => StateFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.stats {
        return handle_stats(&config);
    }

    let seeds = SeedSource::from_inputs(cli.url.clone(), cli.file.clone())?
        .load()
        .context("Failed to load seed URLs")?;
    let excluded = effective_exclusions(&config.scope)?;

    if cli.dry_run {
        handle_dry_run(&config, &seeds, &excluded);
        return Ok(());
    }

    handle_crawl(config, seeds, excluded, cli.fresh, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
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

/// Loads the config file (if any), applies CLI overrides, then validates
fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(workers) = cli.max_threads {
        config.crawler.workers = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
    if cli.retry_failed {
        config.crawler.failure_policy = FailurePolicy::Retry;
    }
    if let Some(grace) = cli.shutdown_grace {
        config.crawler.shutdown_grace_secs = grace;
    }
    if let Some(every) = cli.checkpoint_every {
        config.crawler.checkpoint_every = every;
    }
    if cli.capture_main_only || cli.capture_base_domain_only {
        config.scope.mode = ScopeMode::from_flags(cli.capture_main_only, cli.capture_base_domain_only);
    }
    if let Some(ignore_file) = &cli.ignore_file {
        config.scope.ignore_file = Some(ignore_file.clone());
    }
    if let Some(output) = &cli.output_file {
        config.output.output_path = output.clone();
    }
    if let Some(state) = &cli.state_file {
        config.output.state_path = state.clone();
    }
    if let Some(format) = cli.state_format {
        config.output.state_format = format.into();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, seeds: &[String], excluded: &[String]) {
    println!("=== Ripple-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Failure policy: {:?}", config.crawler.failure_policy);
    println!("  Shutdown grace: {}s", config.crawler.shutdown_grace_secs);
    println!("  Checkpoint every: {} pages", config.crawler.checkpoint_every);
    println!("  Scope mode: {}", config.scope.mode.as_str());

    println!("\nOutput:");
    println!("  CSV: {}", config.output.output_path);
    println!(
        "  State: {} ({:?})",
        config.output.state_path, config.output.state_format
    );

    println!("\nUser Agents ({}):", config.user_agent.agents.len());
    for agent in &config.user_agent.agents {
        println!("  - {}", agent);
    }

    println!("\nExcluded Domains ({}):", excluded.len());
    for domain in excluded {
        println!("  - {}", domain);
    }

    println!("\nSeeds ({}):", seeds.len());
    for seed in seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", seeds.len());
}

/// Handles the --stats mode: shows the saved snapshot and output size
fn handle_stats(config: &Config) -> Result<()> {
    let state_path = Path::new(&config.output.state_path);
    let output_path = Path::new(&config.output.output_path);

    println!("State: {}", state_path.display());
    println!("Output: {}\n", output_path.display());

    let snapshot = if state_path.exists() {
        open_state_store(state_path, config.output.state_format)?.load()?
    } else {
        None
    };
    let rows = read_output(output_path)
        .with_context(|| format!("Failed to read {}", output_path.display()))?;

    print_snapshot_report(snapshot.as_ref(), rows.len());
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    seeds: Vec<String>,
    excluded: Vec<String>,
    fresh: bool,
    quiet: bool,
) -> Result<()> {
    let state_path = Path::new(&config.output.state_path);
    let output_path = Path::new(&config.output.output_path);

    let store = open_state_store(state_path, config.output.state_format)
        .with_context(|| format!("Failed to open crawl state {}", state_path.display()))?;
    let sink = CsvSink::open(output_path)
        .with_context(|| format!("Failed to open output file {}", output_path.display()))?;
    let fetcher = HttpFetcher::new(
        Duration::from_secs(config.crawler.timeout_secs),
        config.user_agent.agents.clone(),
    )?;

    tracing::info!(
        "Scope: {}, {} excluded domains",
        config.scope.mode.as_str(),
        excluded.len()
    );
    let scoper = Scoper::new(excluded, Arc::new(PublicSuffixRegistry), config.scope.mode);

    let engine = Arc::new(CrawlEngine::new(
        scoper,
        Arc::new(fetcher),
        Arc::new(sink),
        store,
        EngineSettings::from_config(&config.crawler),
    ));

    if fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
        engine.clear_state()?;
    } else {
        engine.load_state()?;
    }
    engine.seed(&seeds);

    let shutdown = CancellationToken::new();
    let listener = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                println!("Graceful shutdown initiated...");
                shutdown.cancel();
            }
        })
    };

    let outcome = Arc::clone(&engine).run(shutdown).await;
    listener.abort();

    match outcome {
        Ok(RunOutcome::Interrupted) => {
            println!("State saved.");
        }
        Ok(RunOutcome::Completed) => {
            tracing::info!("Crawl completed successfully");
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    }

    if !quiet {
        print_statistics(&engine.summary());
    }

    Ok(())
}
