//! Error types for page fetching.

use thiserror::Error;

/// Failure to fetch a single page.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("Request to {url} failed with status: {status}")]
    Status { url: String, status: u16 },

    /// Connection, TLS, timeout, or other transport failure.
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The response body could not be read.
    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    /// A redirect pointed outside the allow-list and was not followed.
    #[error("Request to {url} redirected outside the allow-list to {location}")]
    OffDomainRedirect { url: String, location: String },

    /// The redirect chain exceeded the hop limit.
    #[error("Too many redirects from {url}")]
    TooManyRedirects { url: String },
}

impl FetchError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport { .. } | FetchError::Body { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::OffDomainRedirect { .. } | FetchError::TooManyRedirects { .. } => false,
        }
    }

    /// URL of the page that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Body { url, .. }
            | FetchError::OffDomainRedirect { url, .. }
            | FetchError::TooManyRedirects { url } => url,
        }
    }
}
