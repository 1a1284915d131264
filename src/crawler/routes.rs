//! API route extraction from page text

use crate::state::{Method, Route};
use regex::Regex;

/// Finds `METHOD /prefix/...` declarations in documentation prose
///
/// Method tokens match in any case and are reported upper case. The path
/// runs from the prefix over word characters, slashes, braces, parentheses,
/// periods, tildes and hyphens, so templates like `{orgUnitId}` stay intact.
#[derive(Debug, Clone)]
pub struct RouteExtractor {
    pattern: Regex,
}

impl RouteExtractor {
    /// Builds an extractor for paths starting with `prefix` (e.g. `/d2l/api/`)
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"(?i)(GET|POST|PUT|PATCH|DELETE)\s+({}[\w/{{}}().~\-]+)",
            regex::escape(prefix)
        ))?;
        Ok(Self { pattern })
    }

    /// Returns every route in `text` in document order, duplicates included
    pub fn extract(&self, text: &str) -> Vec<Route> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let method = Method::from_token(caps.get(1)?.as_str())?;
                let path = caps.get(2)?.as_str();
                Some(Route::new(method, path))
            })
            .collect()
    }
}
