//! Report aggregation
//!
//! Derives the headline numbers and rankings reports are built from.

use crate::state::{CrawlResult, PageRecord, StopReason};
use serde::Serialize;
use std::collections::BTreeMap;

/// Pages listed in the "top pages by content" ranking
pub const TOP_PAGE_COUNT: usize = 20;

/// Failures listed in the human-readable report
pub const REPORTED_FAILURE_COUNT: usize = 20;

/// Headline numbers of one crawl
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlSummary {
    pub crawl_timestamp: String,
    pub base_url: String,
    /// SHA-256 of the config file the crawl ran with, if known
    pub config_hash: Option<String>,
    pub total_pages: usize,
    pub total_visited_urls: usize,
    pub failed_urls: usize,
    pub skipped_urls: usize,
    pub discarded_low_content: usize,
    pub total_api_routes: usize,
    pub categories: BTreeMap<String, usize>,
    pub stop_reason: StopReason,
    pub elapsed_seconds: f64,
}

impl CrawlSummary {
    pub fn from_result(
        result: &CrawlResult,
        timestamp: impl Into<String>,
        config_hash: Option<String>,
    ) -> Self {
        Self {
            crawl_timestamp: timestamp.into(),
            base_url: result.seed.clone(),
            config_hash,
            total_pages: result.pages.len(),
            total_visited_urls: result.visited,
            failed_urls: result.failures.len(),
            skipped_urls: result.skips.len(),
            discarded_low_content: result.discarded.len(),
            total_api_routes: result.route_total,
            categories: result.categories.clone(),
            stop_reason: result.stop_reason,
            elapsed_seconds: result.elapsed.as_secs_f64(),
        }
    }
}

/// Categories by page count, largest first; ties in name order
pub fn categories_by_count(result: &CrawlResult) -> Vec<(&str, usize)> {
    let mut categories: Vec<_> = result
        .categories
        .iter()
        .map(|(name, count)| (name.as_str(), *count))
        .collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1));
    categories
}

/// The `limit` recorded pages with the most content, longest first
///
/// Pages of equal length keep crawl order.
pub fn top_pages_by_content(result: &CrawlResult, limit: usize) -> Vec<&PageRecord> {
    let mut pages: Vec<_> = result.pages.iter().collect();
    pages.sort_by(|a, b| b.content_length.cmp(&a.content_length));
    pages.truncate(limit);
    pages
}
