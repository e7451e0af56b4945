//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// First page of the catalog listing
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// The only host the crawler may fetch from
    #[serde(default = "default_allowed_domain")]
    pub allowed_domain: String,

    /// CSV file to write (created or truncated)
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Stop after this many pages have been fetched
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// Extra attempts for a page after a transient failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff before the first retry, doubled on each further attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Format of the run report printed after the crawl
    #[serde(default)]
    pub format: ReportFormat,
}

fn default_start_url() -> String {
    "https://books.toscrape.com/".to_string()
}

fn default_allowed_domain() -> String {
    "books.toscrape.com".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("export.csv")
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            allowed_domain: default_allowed_domain(),
            output: default_output(),
            proxy: None,
            max_pages: None,
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            timeout_secs: default_timeout_secs(),
            format: ReportFormat::Text,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("catalog-crawler").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("CATALOG_START_URL") {
            self.start_url = url;
        }

        if let Ok(domain) = std::env::var("CATALOG_DOMAIN") {
            self.allowed_domain = domain;
        }

        if let Ok(output) = std::env::var("CATALOG_OUTPUT") {
            self.output = PathBuf::from(output);
        }

        if let Ok(proxy) = std::env::var("CATALOG_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(max) = std::env::var("CATALOG_MAX_PAGES") {
            if let Ok(m) = max.parse() {
                self.max_pages = Some(m);
            }
        }

        if let Ok(retries) = std::env::var("CATALOG_MAX_RETRIES") {
            if let Ok(r) = retries.parse() {
                self.max_retries = r;
            }
        }

        if let Ok(backoff) = std::env::var("CATALOG_RETRY_BACKOFF_MS") {
            if let Ok(b) = backoff.parse() {
                self.retry_backoff_ms = b;
            }
        }

        if let Ok(timeout) = std::env::var("CATALOG_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        self
    }
}

/// Format of the end-of-run report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown format: {}. Use: text, json", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}
