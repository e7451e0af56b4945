//! Catalog-specific modules for fetching, parsing, and traversal.

pub mod client;
pub mod crawler;
pub mod models;
pub mod parser;
pub mod scope;
pub mod selectors;

pub use client::{CatalogClient, PageFetcher};
pub use crawler::{Crawler, RetryPolicy};
pub use models::{CatalogPage, CrawlSummary, FetchedPage, Record};
pub use parser::Parser;
pub use scope::AllowList;
