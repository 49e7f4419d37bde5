//! Gleaner main entry point
//!
//! This is the command-line interface for the Gleaner batch page harvester.

use anyhow::Context;
use clap::Parser;
use gleaner::config::{load_config_with_hash, validate, Config};
use gleaner::crawler::{HttpFetcher, Orchestrator};
use gleaner::output::print_summary;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Gleaner: a batch page harvester
///
/// Gleaner fetches a list of links in bounded groups, extracts a title and the
/// raw content of every page, and optionally appends each page to a text log.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "A batch page harvester", long_about = None)]
struct Cli {
    /// Links to fetch
    #[arg(value_name = "LINK")]
    links: Vec<String>,

    /// File with one link per line (blank lines and lines starting with '#' are skipped)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of links per group
    #[arg(long, allow_negative_numbers = true)]
    group_size: Option<i64>,

    /// Append every accepted page to a timestamped text log
    #[arg(long)]
    log: bool,

    /// Directory for the text log
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_settings(&cli)?;
    let links = collect_links(&cli)?;

    tracing::info!(
        "Group size: {}, logging: {}",
        config.scraper.group_size,
        config.output.log_enabled
    );

    let fetcher = Arc::new(HttpFetcher::new(&config.user_agent)?);
    let orchestrator = Orchestrator::from_config(&config, fetcher)?;

    let quiet = cli.quiet;
    let results = orchestrator
        .run(&links, |summary| {
            println!("---- Crawl completed ({} links) ----", summary.links_requested);
            if !quiet {
                print_summary(summary);
            }
        })
        .await?;

    for (link, result) in links.iter().zip(&results) {
        match result {
            Some(record) => println!("{} => {}", link, record.title),
            None => println!("{} => <absent>", link),
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
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

/// Loads the configuration file (if any) and applies command-line overrides
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(group_size) = cli.group_size {
        config.scraper.group_size = group_size;
    }
    if cli.log {
        config.output.log_enabled = true;
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.output_dir = output_dir.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Gathers links from the command line and the input file, in that order
fn collect_links(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let mut links = cli.links.clone();

    if let Some(path) = &cli.input {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read links from {}", path.display()))?;
        links.extend(parse_link_lines(&content));
    }

    if links.is_empty() {
        tracing::warn!("No links given; nothing will be fetched");
    }

    Ok(links)
}

fn parse_link_lines(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}
