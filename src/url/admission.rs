use crate::UrlError;
use url::Url;

/// Decides whether a candidate address belongs to the crawl
///
/// The candidate must parse as an absolute URL and its host must equal
/// `origin_host` exactly. Subdomains, a different scheme or a different
/// port are not considered: only the hostname is compared. Parse failures
/// are reported as `false`, never as an error.
///
/// # Examples
///
/// ```
/// use link_patrol::url::is_admissible;
///
/// assert!(is_admissible("https://example.com/about", "example.com"));
/// assert!(is_admissible("http://example.com:8080/", "example.com"));
/// assert!(!is_admissible("https://blog.example.com/", "example.com"));
/// assert!(!is_admissible("not a url", "example.com"));
/// ```
pub fn is_admissible(candidate: &str, origin_host: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => url.host_str() == Some(origin_host),
        Err(_) => false,
    }
}

/// Extracts the origin host that bounds a crawl started at `seed`
///
/// The host is returned in the parser's canonical (lowercase) form, so it
/// can be compared directly against hosts of parsed candidates.
pub fn origin_host_of(seed: &str) -> Result<String, UrlError> {
    let url = Url::parse(seed).map_err(|e| UrlError::Parse(e.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(UrlError::MissingHost),
    }
}
