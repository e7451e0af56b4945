//! Data models for catalog records and parsed pages.

use serde::{Deserialize, Serialize};
use url::Url;

/// One catalog item as exported: a title and a price, both verbatim text.
///
/// Fields are empty strings when the page markup lacks the expected
/// element or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Item title, taken from the cover image's alt text
    #[serde(rename = "Title")]
    pub title: String,
    /// Item price exactly as displayed (currency symbol included)
    #[serde(rename = "Price")]
    pub price: String,
}

impl Record {
    /// Creates a new record.
    pub fn new(title: impl Into<String>, price: impl Into<String>) -> Self {
        Self { title: title.into(), price: price.into() }
    }
}

/// Everything extracted from a single listing page.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    /// Records in document order
    pub records: Vec<Record>,
    /// Absolute next-page URLs in document order (normally zero or one)
    pub next_pages: Vec<Url>,
    /// Pager label such as "Page 1 of 50", if present
    pub page_label: Option<String>,
}

impl CatalogPage {
    /// Returns number of records.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the page links to at least one further page.
    pub fn has_next(&self) -> bool {
        !self.next_pages.is_empty()
    }
}

/// A fetched page body together with the URL it was finally served from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects; relative links resolve against this
    pub url: Url,
    /// Response body
    pub body: String,
}

/// Outcome of a crawl run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// URLs fetched successfully, in visit order
    pub visited: Vec<String>,
    /// Data rows written to the export
    pub records_written: usize,
    /// URLs skipped because their host is outside the allow-list
    pub skipped_off_domain: Vec<String>,
    /// URLs whose fetch failed after all retries
    pub failed: Vec<String>,
}

impl CrawlSummary {
    /// Returns number of pages fetched.
    pub fn pages_visited(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if every attempted page was fetched.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
