use crate::url::domain::is_same_domain;
use url::{ParseError, Url};

/// Resolves an anchor `href` into a same-domain path worth following
///
/// # Rules
///
/// 1. The value is trimmed; empty values are rejected
/// 2. Absolute URLs must use `http` or `https` and point at `domain`
/// 3. Relative references must already start with `/`; they are joined onto
///    `http://<domain>/` only to normalise dot segments and percent-encoding
/// 4. Protocol-relative references (`//host/...`) are host-checked like
///    absolute ones
/// 5. Query strings and fragments are dropped
///
/// # Returns
///
/// * `Some(path)` - The URL path to crawl
/// * `None` - The link must not be followed
///
/// # Examples
///
/// ```
/// use sumi_indexer::url::resolve_link;
///
/// assert_eq!(resolve_link("/about?x=1", "example.com"), Some("/about".to_string()));
/// assert_eq!(resolve_link("https://example.com/a/../b", "example.com"), Some("/b".to_string()));
/// assert_eq!(resolve_link("https://other.com/", "example.com"), None);
/// assert_eq!(resolve_link("page.html", "example.com"), None);
/// ```
pub fn resolve_link(href: &str, domain: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => {
            if !href.starts_with('/') {
                return None;
            }
            let base = Url::parse(&format!("http://{}/", domain)).ok()?;
            base.join(href).ok()?
        }
        Err(_) => return None,
    };

    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    if !is_same_domain(&url, domain) {
        return None;
    }

    let path = url.path();
    if !path.starts_with('/') {
        return None;
    }

    Some(path.to_string())
}
