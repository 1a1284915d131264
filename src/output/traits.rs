//! Report sink trait and errors
//!
//! A report sink turns a finished crawl and its coverage data into files,
//! consoles or whatever else presents them. The crawl itself never writes
//! output.

use crate::coverage::{CoverageBaseline, CoverageReport};
use crate::output::aggregate::CrawlSummary;
use crate::state::CrawlResult;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Consumes crawl results and coverage comparisons
pub trait ReportSink {
    /// What the sink hands back after writing a crawl, such as file paths
    type Written;

    /// Writes everything one crawl produced
    ///
    /// # Arguments
    ///
    /// * `result` - The finished crawl
    /// * `summary` - Headline numbers derived from `result`
    /// * `baseline` - The coverage baseline derived from `result`
    fn write_crawl(
        &self,
        result: &CrawlResult,
        summary: &CrawlSummary,
        baseline: &CoverageBaseline,
    ) -> OutputResult<Self::Written>;

    /// Writes the result of checking another scrape against a baseline
    fn write_comparison(&self, report: &CoverageReport) -> OutputResult<()>;
}
