/// Checks if a host is a domain suffix or one of its subdomains
///
/// `suffix` is a bare domain such as `example.com` (see
/// [`merge_exclusions`](crate::config::merge_exclusions), which strips any
/// `*.` prefix). The match is label-aligned: `example.com` matches
/// `example.com` and `a.b.example.com`, never `notexample.com`.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::matches_suffix;
///
/// assert!(matches_suffix("example.com", "example.com"));
/// assert!(matches_suffix("example.com", "blog.example.com"));
/// assert!(!matches_suffix("example.com", "myexample.com"));
/// assert!(!matches_suffix("example.com", "example.org"));
/// ```
pub fn matches_suffix(suffix: &str, host: &str) -> bool {
    if suffix.is_empty() || host.is_empty() {
        return false;
    }

    match host.strip_suffix(suffix) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}
