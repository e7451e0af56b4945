//! Domain allow-list for the crawler.

use std::collections::HashSet;
use url::Url;

/// Set of hostnames the crawler may fetch from.
///
/// Matching is exact on the host; ports and schemes are ignored, and
/// subdomains are not implied.
#[derive(Debug, Clone)]
pub struct AllowList {
    hosts: HashSet<String>,
}

impl AllowList {
    /// Creates an allow-list from hostnames.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { hosts: hosts.into_iter().map(|h| normalize(h.as_ref())).collect() }
    }

    /// Creates an allow-list with a single host.
    pub fn single(host: &str) -> Self {
        Self::new([host])
    }

    /// Returns true if a fetch of `url` is permitted.
    pub fn permits(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| self.permits_host(host))
    }

    /// Returns true if `host` is on the list.
    pub fn permits_host(&self, host: &str) -> bool {
        self.hosts.contains(&normalize(host))
    }
}

fn normalize(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}
