use url::Url;

/// Resolves a link href against the page it was found on
///
/// Returns None if the link should be skipped:
/// - empty hrefs
/// - fragment-only references (same-page anchors)
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - hrefs that fail to resolve
/// - anything that is not HTTP(S) with a host after resolution
///
/// No canonicalization happens beyond absolute-form resolution, except that
/// the fragment is dropped: two links differing only in `#...` name the same
/// resource.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::resolve;
///
/// let base = Url::parse("https://example.com/docs/index.html").unwrap();
/// let url = resolve(&base, "../about?x=1#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about?x=1");
///
/// assert!(resolve(&base, "#top").is_none());
/// assert!(resolve(&base, "mailto:someone@example.com").is_none());
/// ```
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base.join(href).ok()?;

    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    if absolute.host_str().is_none() {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn resolved(href: &str) -> Option<String> {
        resolve(&base_url(), href).map(|u| u.to_string())
    }

    #[test]
    fn test_absolute_link() {
        assert_eq!(
            resolved("https://other.com/page"),
            Some("https://other.com/page".to_string())
        );
    }

    #[test]
    fn test_root_relative_link() {
        assert_eq!(
            resolved("/other"),
            Some("https://example.com/other".to_string())
        );
    }

    #[test]
    fn test_path_relative_link() {
        assert_eq!(
            resolved("other"),
            Some("https://example.com/other".to_string())
        );
    }

    #[test]
    fn test_scheme_relative_link() {
        assert_eq!(
            resolved("//cdn.example.net/lib"),
            Some("https://cdn.example.net/lib".to_string())
        );
    }

    #[test]
    fn test_query_kept_as_is() {
        assert_eq!(
            resolved("/search?b=2&a=1"),
            Some("https://example.com/search?b=2&a=1".to_string())
        );
    }

    #[test]
    fn test_trailing_slash_kept() {
        assert_eq!(
            resolved("/dir/"),
            Some("https://example.com/dir/".to_string())
        );
    }

    #[test]
    fn test_fragment_dropped_after_resolution() {
        assert_eq!(
            resolved("/other#section"),
            Some("https://example.com/other".to_string())
        );
    }

    #[test]
    fn test_skip_empty_and_whitespace() {
        assert_eq!(resolved(""), None);
        assert_eq!(resolved("   "), None);
    }

    #[test]
    fn test_skip_fragment_only() {
        assert_eq!(resolved("#section"), None);
    }

    #[test]
    fn test_skip_special_schemes() {
        assert_eq!(resolved("javascript:void(0)"), None);
        assert_eq!(resolved("JavaScript:alert(1)"), None);
        assert_eq!(resolved("mailto:test@example.com"), None);
        assert_eq!(resolved("tel:+1234567890"), None);
        assert_eq!(resolved("data:text/html,<h1>Test</h1>"), None);
    }

    #[test]
    fn test_skip_non_http_schemes() {
        assert_eq!(resolved("ftp://example.com/file"), None);
        assert_eq!(resolved("file:///etc/passwd"), None);
    }
}
