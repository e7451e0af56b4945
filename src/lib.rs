//! catalog-crawler - Paginating catalog crawler with CSV export
//!
//! Follows a listing's "next" links within a single allowed domain and
//! streams each item's title and price to a CSV file.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod format;

pub use catalog::{AllowList, CrawlSummary, Crawler, Record};
pub use config::Config;
pub use error::FetchError;
pub use export::Exporter;
