//! Crawl command implementation.

use crate::catalog::{CatalogClient, CrawlSummary, Crawler, PageFetcher};
use crate::config::Config;
use crate::export::Exporter;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::info;

/// Crawls the catalog and exports every record to CSV.
pub struct CrawlCommand {
    config: Config,
}

impl CrawlCommand {
    /// Creates a new crawl command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the crawl and returns the formatted run report.
    pub async fn execute(&self) -> Result<String> {
        let summary = self.run().await?;
        Ok(self.report(&summary))
    }

    /// Runs the crawl over HTTP and returns the summary.
    pub async fn run(&self) -> Result<CrawlSummary> {
        let client =
            CatalogClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.crawl(&client).await
    }

    /// Executes the crawl with a provided fetcher (for testing).
    pub async fn execute_with_client(&self, client: &impl PageFetcher) -> Result<String> {
        let summary = self.crawl(client).await?;
        Ok(self.report(&summary))
    }

    /// Runs the crawl into the configured output file.
    ///
    /// The output file is created before the first fetch, so an unwritable
    /// destination fails the run without touching the network. The export is
    /// flushed whether or not the crawl itself succeeds.
    pub async fn crawl(&self, client: &impl PageFetcher) -> Result<CrawlSummary> {
        let crawler = Crawler::from_config(&self.config)?;
        let mut exporter = Exporter::create(&self.config.output)?;

        info!("Exporting to {}", self.config.output.display());

        let result = crawler.run(client, &mut exporter).await;
        let finished = exporter.finish();

        let summary = result?;
        finished?;
        Ok(summary)
    }

    fn report(&self, summary: &CrawlSummary) -> String {
        Formatter::new(self.config.format).format_summary(summary, &self.config.output)
    }
}
