use crate::{UrlError, UrlResult};
use serde::Serialize;
use std::fmt;
use url::Url;

/// Canonical identity of a page inside one crawl
///
/// Two links that differ only by fragment, a trailing `/index.html` or
/// trailing slashes map to the same `CrawlUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CrawlUrl(String);

impl CrawlUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the normalized string back into a fetchable URL
    pub fn to_url(&self) -> UrlResult<Url> {
        let url = Url::parse(&self.0).map_err(|e| UrlError::Parse(e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }
        if url.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }
        Ok(url)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CrawlUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CrawlUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

const INDEX_SUFFIX: &str = "/index.html";

/// Normalizes an absolute URL for identity comparison
///
/// # Normalization Steps
///
/// 1. Drop the fragment (everything after `#`)
/// 2. Split off the query string, which is kept verbatim
/// 3. Repeatedly strip a trailing `/index.html` and trailing `/` from the
///    remainder until neither applies
///
/// Relative references are not resolved here; resolve them against the
/// page URL first.
///
/// # Examples
///
/// ```
/// use docsweep::url::normalize;
///
/// let a = normalize("https://docs.example.com/a/index.html");
/// let b = normalize("https://docs.example.com/a/#intro");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "https://docs.example.com/a");
/// ```
pub fn normalize(raw: &str) -> CrawlUrl {
    let without_fragment = raw.split_once('#').map_or(raw, |(head, _)| head);

    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (without_fragment, None),
    };

    let mut base = base;
    loop {
        if let Some(stripped) = base.strip_suffix(INDEX_SUFFIX) {
            base = stripped;
        } else if let Some(stripped) = base.strip_suffix('/') {
            base = stripped;
        } else {
            break;
        }
    }

    match query {
        Some(query) => CrawlUrl(format!("{}?{}", base, query)),
        None => CrawlUrl(base.to_string()),
    }
}

/// Resolves an `href` found on `page` into an absolute URL
///
/// Returns None for links the crawl ignores outright:
/// - fragment-only links (`#section`)
/// - `mailto:` links
/// - hrefs that cannot be joined onto the page URL
pub fn resolve_href(page: &Url, href: &str) -> Option<Url> {
    if href.starts_with('#') || href.starts_with("mailto:") {
        return None;
    }

    page.join(href).ok()
}
