use crate::coverage::{read_json, ComparisonError, ComparisonResult};
use crate::output::OutputResult;
use crate::state::CrawlResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of recorded page URLs kept as samples
pub const SAMPLE_URL_COUNT: usize = 50;

/// Ground truth derived from one crawl
///
/// Field names are part of the file format shared with other scrapers and
/// must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageBaseline {
    pub expected_minimum_pages: usize,
    pub expected_minimum_routes: usize,
    pub categories: Vec<String>,
    /// First recorded pages, in crawl order
    pub sample_urls: Vec<String>,
    pub validation_timestamp: String,
}

impl CoverageBaseline {
    /// Builds the baseline for a finished crawl
    pub fn from_result(result: &CrawlResult, timestamp: impl Into<String>) -> Self {
        Self {
            expected_minimum_pages: result.pages.len(),
            expected_minimum_routes: result.route_total,
            categories: result.categories.keys().cloned().collect(),
            sample_urls: result
                .pages
                .iter()
                .take(SAMPLE_URL_COUNT)
                .map(|page| page.url.clone())
                .collect(),
            validation_timestamp: timestamp.into(),
        }
    }

    pub fn load(path: &Path) -> ComparisonResult<Self> {
        read_json(path, ComparisonError::MissingBaseline)
    }

    /// Writes the baseline as pretty-printed JSON
    pub fn save(&self, path: &Path) -> OutputResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
