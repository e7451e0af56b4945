//! HTTP client for catalog pages using wreq for TLS fingerprint emulation.

use crate::catalog::models::FetchedPage;
use crate::catalog::scope::AllowList;
use crate::config::Config;
use crate::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use wreq::header::LOCATION;
use wreq::{redirect, Client};
use wreq_util::Emulation;

/// Longest redirect chain followed for a single page.
const MAX_REDIRECTS: usize = 10;

/// Trait for page fetching - enables fixture pages in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a page and returns its body and final URL.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Catalog HTTP client with browser impersonation.
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Creates a new client with the given configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(redirect_policy(AllowList::single(&config.allowed_domain)));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

/// Follows redirects within the allow-list; a hop to any other host is
/// never requested and the 3xx response is returned as is.
fn redirect_policy(allow: AllowList) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if attempt.previous.len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if attempt.uri.host().is_some_and(|host| allow.permits_host(host)) {
            attempt.follow()
        } else {
            attempt.stop()
        }
    })
}

#[async_trait]
impl PageFetcher for CatalogClient {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.as_str())
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .map_err(|e| {
                if e.is_redirect() {
                    FetchError::TooManyRedirects { url: url.to_string() }
                } else {
                    FetchError::Transport { url: url.to_string(), message: e.to_string() }
                }
            })?;

        let status = response.status();
        debug!("Response status: {}", status);

        let final_url = match Url::parse(&response.uri().to_string()) {
            Ok(final_url) => final_url,
            Err(e) => {
                warn!("Could not parse final URL for {}: {}", url, e);
                url.clone()
            }
        };
        if final_url != *url {
            debug!("Redirected: {} -> {}", url, final_url);
        }

        if status.is_redirection() {
            if let Some(location) = response.headers().get(LOCATION).and_then(|v| v.to_str().ok()) {
                let location = final_url
                    .join(location)
                    .map(String::from)
                    .unwrap_or_else(|_| location.to_string());
                return Err(FetchError::OffDomainRedirect { url: url.to_string(), location });
            }
        }

        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body { url: url.to_string(), message: e.to_string() })?;

        Ok(FetchedPage { url: final_url, body })
    }
}
