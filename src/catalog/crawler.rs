//! Queue-driven traversal of a paginated catalog.

use crate::catalog::client::PageFetcher;
use crate::catalog::models::{CrawlSummary, FetchedPage};
use crate::catalog::parser::Parser;
use crate::catalog::scope::AllowList;
use crate::config::Config;
use crate::error::FetchError;
use crate::export::Exporter;
use anyhow::{Context, Result};
use rand::Rng;
use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Bounded retry with exponential backoff for transient fetch failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each further attempt
    pub backoff_ms: u64,
}

impl RetryPolicy {
    /// Never retries.
    pub fn none() -> Self {
        Self { max_retries: 0, backoff_ms: 0 }
    }

    /// Backoff before retry number `attempt` (1-based), jitter included.
    fn backoff(&self, attempt: u32) -> Duration {
        if self.backoff_ms == 0 {
            return Duration::ZERO;
        }

        let base = self.backoff_ms.saturating_mul(1u64 << (attempt - 1).min(16));
        let jitter = rand::rng().random_range(0..=self.backoff_ms / 2);
        Duration::from_millis(base.saturating_add(jitter))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 2, backoff_ms: 500 }
    }
}

/// Follows "next" links from a seed page, streaming records to an exporter.
pub struct Crawler {
    seed: Url,
    allow: AllowList,
    parser: Parser,
    retry: RetryPolicy,
    max_pages: Option<usize>,
}

impl Crawler {
    /// Creates a crawler for `seed`, restricted to the hosts in `allow`.
    pub fn new(seed: Url, allow: AllowList) -> Self {
        Self { seed, allow, parser: Parser::new(), retry: RetryPolicy::default(), max_pages: None }
    }

    /// Builds a crawler from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let seed = Url::parse(&config.start_url)
            .with_context(|| format!("Invalid start URL: {}", config.start_url))?;

        Ok(Self::new(seed, AllowList::single(&config.allowed_domain))
            .with_retry(RetryPolicy {
                max_retries: config.max_retries,
                backoff_ms: config.retry_backoff_ms,
            })
            .with_max_pages(config.max_pages))
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Caps the number of pages fetched.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Runs the crawl to completion.
    ///
    /// Pages are fetched one at a time in discovery order. Every URL is
    /// enqueued at most once, so pagination cycles terminate. A page that
    /// cannot be fetched ends its branch of the traversal; only export
    /// failures abort the run.
    pub async fn run<W: Write>(
        &self,
        fetcher: &impl PageFetcher,
        exporter: &mut Exporter<W>,
    ) -> Result<CrawlSummary> {
        let mut summary = CrawlSummary::default();
        let mut queue = VecDeque::from([self.seed.clone()]);
        let mut seen = HashSet::from([queue_key(&self.seed)]);

        while let Some(url) = queue.pop_front() {
            if let Some(max) = self.max_pages {
                if summary.pages_visited() >= max {
                    info!("Reached page limit ({}), stopping", max);
                    break;
                }
            }

            if !self.allow.permits(&url) {
                debug!("Skipping {}: host not in allow-list", url);
                summary.skipped_off_domain.push(url.to_string());
                continue;
            }

            info!("Visiting: {}", url);

            let page = match self.fetch_with_retry(fetcher, &url).await {
                Ok(page) => page,
                Err(FetchError::OffDomainRedirect { location, .. }) => {
                    warn!(
                        "{} redirected outside the allow-list to {}, not following",
                        url, location
                    );
                    summary.visited.push(url.to_string());
                    summary.skipped_off_domain.push(location);
                    continue;
                }
                Err(e) => {
                    warn!("Giving up on {}: {}", url, e);
                    summary.failed.push(url.to_string());
                    continue;
                }
            };
            summary.visited.push(url.to_string());

            let parsed = self.parser.parse_page(&page.body, &page.url);
            if let Some(label) = &parsed.page_label {
                debug!("{} ({})", label, page.url);
            }

            debug!("{} records on {}", parsed.count(), page.url);
            for record in &parsed.records {
                exporter.write(record)?;
            }
            summary.records_written = exporter.rows();

            for next in parsed.next_pages {
                if seen.insert(queue_key(&next)) {
                    queue.push_back(next);
                } else {
                    debug!("Already queued or visited: {}", next);
                }
            }
        }

        if summary.is_clean() {
            info!(
                "Crawl finished: {} pages, {} records",
                summary.pages_visited(),
                summary.records_written
            );
        } else {
            warn!(
                "Crawl finished: {} pages, {} records, {} skipped, {} failed",
                summary.pages_visited(),
                summary.records_written,
                summary.skipped_off_domain.len(),
                summary.failed.len()
            );
        }

        Ok(summary)
    }

    async fn fetch_with_retry(
        &self,
        fetcher: &impl PageFetcher,
        url: &Url,
    ) -> Result<FetchedPage, FetchError> {
        let mut attempt = 0;
        loop {
            match fetcher.fetch(url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        "Fetch failed ({}), retry {}/{} in {}ms",
                        e,
                        attempt,
                        self.retry.max_retries,
                        delay.as_millis()
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn queue_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}
