//! HTML parser for extracting hyperlink targets
//!
//! Links are reported the way a browser exposes an anchor's resolved `href`:
//! absolute, resolved against the document's `<base href>` when present, in
//! document order, duplicates included. Only HTTP(S) targets are kept.

use scraper::{Html, Selector};
use url::Url;

/// Extracts hyperlink targets from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - every `<a href="...">`, resolved to an absolute URL
///
/// **Exclude:**
/// - `<a>` elements without an `href` attribute
/// - targets whose scheme is not `http` or `https` (`mailto:`,
///   `javascript:`, `tel:`, `data:` ...)
/// - targets that cannot be resolved
///
/// # Example
///
/// ```
/// use link_patrol::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(
///     extract_links(html, &page_url),
///     vec!["https://example.com/page".to_string()]
/// );
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let base_url = document_base(&document, page_url);
    collect_links(&document, &base_url)
}

/// Returns the URL relative links resolve against
///
/// The first `<base href>` wins; an unresolvable base falls back to the
/// page URL.
fn document_base(document: &Html, page_url: &Url) -> Url {
    let Ok(base_selector) = Selector::parse("base[href]") else {
        return page_url.clone();
    };

    document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

fn collect_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute HTTP(S) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let absolute_url = base_url.join(href.trim()).ok()?;

    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
