//! Output module for crawl reports
//!
//! This module handles:
//! - Aggregating a finished crawl into headline numbers and rankings
//! - Writing JSON and text reports through a [`ReportSink`]
//! - Formatting coverage comparisons for the terminal

mod aggregate;
mod json;
mod text;
mod traits;

pub use aggregate::{
    categories_by_count, top_pages_by_content, CrawlSummary, REPORTED_FAILURE_COUNT,
    TOP_PAGE_COUNT,
};
pub use json::{JsonReportWriter, ReportPaths, FILE_TIMESTAMP_FORMAT};
pub use text::{format_coverage_report, format_text_report};
pub use traits::{OutputError, OutputResult, ReportSink};

use crate::coverage::CoverageBaseline;
use crate::state::CrawlResult;

/// Writes every report for a finished crawl through `sink`
///
/// The summary and baseline share one timestamp so the files of one crawl
/// can be matched up.
pub fn write_reports<S: ReportSink>(
    sink: &S,
    result: &CrawlResult,
    timestamp: &str,
    config_hash: Option<String>,
) -> OutputResult<S::Written> {
    let summary = CrawlSummary::from_result(result, timestamp, config_hash);
    let baseline = CoverageBaseline::from_result(result, timestamp);
    sink.write_crawl(result, &summary, &baseline)
}
