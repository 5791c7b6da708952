use url::Url;

/// Extracts the authority a crawled domain is compared against
///
/// This is the lowercase host, followed by `:port` when the URL carries a
/// non-default port. Returns `None` for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_indexer::url::authority;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Canonical form of a domain name given on the command line or in a list
///
/// Host names compare case-insensitively, so the store and the caches key
/// domains by their lowercase form.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().to_ascii_lowercase()
}

/// Returns true if `url` points at `domain`
pub fn is_same_domain(url: &Url, domain: &str) -> bool {
    authority(url).is_some_and(|a| a.eq_ignore_ascii_case(domain))
}
