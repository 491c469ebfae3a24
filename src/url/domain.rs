use std::net::IpAddr;
use url::Url;

/// Extracts the host from a URL
///
/// This function retrieves the host portion of a URL, converts it to lowercase
/// and drops the trailing `.` of an absolute name, so `github.com.` and
/// `github.com` compare equal. If the URL has no host (which shouldn't happen
/// for valid HTTP(S) URLs), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .map(|h| h.trim_end_matches('.').to_lowercase())
        .filter(|h| !h.is_empty())
}

/// Maps a host to its registrable domain
///
/// Implementations must be pure lookups; the crawler calls them from every
/// worker concurrently.
pub trait DomainRegistry: Send + Sync {
    /// Returns the public-suffix-aware root domain of `host`, or `None` when
    /// the host has no registrable part (bare suffixes, IPs, single labels)
    fn registrable_domain(&self, host: &str) -> Option<String>;
}

/// Registry backed by the compiled-in public suffix list
#[derive(Debug, Default, Clone, Copy)]
pub struct PublicSuffixRegistry;

impl DomainRegistry for PublicSuffixRegistry {
    fn registrable_domain(&self, host: &str) -> Option<String> {
        let host = host.trim_end_matches('.').to_lowercase();

        if host.is_empty() || host.starts_with('[') || host.parse::<IpAddr>().is_ok() {
            return None;
        }

        psl::domain_str(&host).map(str::to_string)
    }
}
