//! Domain-Crawler main entry point
//!
//! This is the command-line interface for the Domain-Crawler batch extractor.

use chrono::Utc;
use clap::Parser;
use domain_crawler::config::{load_config_with_hash, load_default_config, Config};
use domain_crawler::crawler::Coordinator;
use domain_crawler::output::{print_summary, render_json_report, write_json_report, JsonReport};
use domain_crawler::server;
use domain_crawler::url::{parse_target_url, remove_duplicates};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Domain-Crawler: a bounded-parallel page extractor
///
/// Domain-Crawler fetches a batch of URLs, extracts each page's title, meta
/// descriptions and links, and counts keyword occurrences. It runs either as
/// a one-shot command or as an HTTP service.
#[derive(Parser, Debug)]
#[command(name = "domain-crawler")]
#[command(version)]
#[command(about = "A bounded-parallel page extractor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run the HTTP service instead of a one-shot crawl
    #[arg(long, conflicts_with_all = ["dry_run", "output"])]
    serve: bool,

    /// Validate config and URLs and show what would be crawled
    #[arg(long, conflicts_with = "serve")]
    dry_run: bool,

    /// URL to crawl (repeatable)
    #[arg(short, long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Keyword to count on every page (repeatable)
    #[arg(short, long = "keyword", value_name = "KEYWORD")]
    keywords: Vec<String>,

    /// Write the JSON report to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_configuration(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, cli.urls)?;
    } else if cli.serve {
        handle_serve(config).await?;
    } else {
        handle_crawl(config, cli.urls, cli.keywords, cli.output).await?;
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
            0 => EnvFilter::new("domain_crawler=info,warn"),
            1 => EnvFilter::new("domain_crawler=debug,info"),
            2 => EnvFilter::new("domain_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Stdout carries the JSON report, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given, otherwise the defaults
fn load_configuration(path: Option<&PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Ok(load_default_config()?)
        }
    }
}

/// Validates every URL and removes duplicates
fn prepare_urls(urls: Vec<String>) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if urls.is_empty() {
        return Err("no URLs given; pass --url at least once or use --serve".into());
    }

    for url in &urls {
        parse_target_url(url)?;
    }

    Ok(remove_duplicates(urls))
}

/// Handles the --dry-run mode: validates input and shows what would be crawled
fn handle_dry_run(config: &Config, urls: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Domain-Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent extractions: {}",
        config.crawler.max_concurrent_extractions
    );
    println!("  Request timeout: {}ms", config.crawler.request_timeout);
    println!("  Connect timeout: {}ms", config.crawler.connect_timeout);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_address());
    println!(
        "  Rate limit: {} requests/minute per client",
        config.server.rate_limit_rpm
    );

    let unique = prepare_urls(urls)?;
    println!("\nURLs ({}):", unique.len());
    for url in &unique {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} URLs", unique.len());

    Ok(())
}

/// Handles the --serve mode: runs the HTTP service until Ctrl-C
async fn handle_serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = Coordinator::from_config(&config)?;

    tracing::info!(
        limit = coordinator.concurrency_limit(),
        "Starting HTTP service on {}",
        config.server.bind_address()
    );

    match server::serve(&config, Arc::new(coordinator)).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("HTTP service failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the main one-shot crawl
async fn handle_crawl(
    config: Config,
    urls: Vec<String>,
    keywords: Vec<String>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let urls = prepare_urls(urls)?;
    let coordinator = Coordinator::from_config(&config)?;

    // Ctrl-C stops the crawl; finished URLs are still reported.
    let cancel = CancellationToken::new();
    tokio::spawn(server::cancel_on_ctrl_c(cancel.clone()));

    let started_at = Utc::now();
    let report = match coordinator.run(urls, keywords, cancel).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };
    let document = JsonReport::new(&report, started_at, Utc::now());

    match output {
        Some(path) => {
            write_json_report(&document, &path)?;
            tracing::info!("Report written to: {}", path.display());
        }
        None => println!("{}", render_json_report(&document)?),
    }

    print_summary(&document.summary);

    Ok(())
}
