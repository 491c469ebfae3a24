//! HTML link extraction
//!
//! Extraction is best-effort: scraper tolerates malformed markup, so a broken
//! page yields whatever anchors survive parsing (possibly none) instead of an
//! error.

use scraper::{Html, Selector};

/// Extracts the raw `href` value of every `<a href>` element, in document order
///
/// Values are returned untouched; resolution and filtering happen in
/// [`Scoper::admit`](crate::url::Scoper::admit).
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a><a>none</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
