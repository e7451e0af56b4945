//! catalog-crawler - Paginating catalog crawler with CSV export

use anyhow::Result;
use catalog_crawler::commands::CrawlCommand;
use catalog_crawler::config::{Config, ReportFormat};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "catalog-crawler",
    version,
    about = "Crawl a paginated catalog and export titles and prices to CSV",
    long_about = "Starts at a listing page, follows its \"next\" links within one allowed domain, \
                  and writes every item's title and price to a CSV file."
)]
struct Cli {
    /// First listing page to fetch
    #[arg(short, long, env = "CATALOG_START_URL")]
    start_url: Option<String>,

    /// Only host the crawler may fetch from
    #[arg(short, long, env = "CATALOG_DOMAIN")]
    domain: Option<String>,

    /// CSV file to write (created or truncated)
    #[arg(short, long, env = "CATALOG_OUTPUT")]
    output: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, env = "CATALOG_PROXY")]
    proxy: Option<String>,

    /// Stop after this many pages
    #[arg(long, env = "CATALOG_MAX_PAGES")]
    max_pages: Option<usize>,

    /// Retries per page after a transient failure
    #[arg(long, env = "CATALOG_MAX_RETRIES")]
    retries: Option<u32>,

    /// Delay before the first retry in milliseconds
    #[arg(long, env = "CATALOG_RETRY_BACKOFF_MS")]
    backoff_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, env = "CATALOG_TIMEOUT")]
    timeout: Option<u64>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format printed after the crawl
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(start_url) = cli.start_url {
        config.start_url = start_url;
    }
    if let Some(domain) = cli.domain {
        config.allowed_domain = domain;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(max_pages) = cli.max_pages {
        config.max_pages = Some(max_pages);
    }
    if let Some(retries) = cli.retries {
        config.max_retries = retries;
    }
    if let Some(backoff_ms) = cli.backoff_ms {
        config.retry_backoff_ms = backoff_ms;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    let cmd = CrawlCommand::new(config);
    let output = cmd.execute().await?;
    println!("{}", output);

    Ok(())
}
