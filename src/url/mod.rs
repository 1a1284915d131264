//! URL handling module for Docsweep
//!
//! This module provides URL normalization, link resolution and the scope
//! filter that keeps the crawl on the documentation host.

mod normalize;
mod scope;

// Re-export main types and functions
pub use normalize::{normalize, resolve_href, CrawlUrl};
pub use scope::ScopeFilter;

use url::Url;

/// Derives the category of a page from its URL
///
/// The category is the first non-empty path segment. Pages directly under
/// the root (no segment, or a first segment that is itself a `.html` file)
/// belong to `"root"`.
///
/// # Examples
///
/// ```
/// use docsweep::url::category_of;
/// use url::Url;
///
/// let url = Url::parse("https://docs.example.com/res/user.html").unwrap();
/// assert_eq!(category_of(&url), "res");
///
/// let url = Url::parse("https://docs.example.com/index.html").unwrap();
/// assert_eq!(category_of(&url), "root");
/// ```
pub fn category_of(url: &Url) -> String {
    let first = url
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()));

    match first {
        Some(segment) if !segment.ends_with(".html") => segment.to_string(),
        _ => ROOT_CATEGORY.to_string(),
    }
}

/// Category of pages that sit directly under the site root
pub const ROOT_CATEGORY: &str = "root";
