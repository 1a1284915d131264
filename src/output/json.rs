//! JSON report files
//!
//! [`JsonReportWriter`] writes one set of timestamped files per crawl into
//! the output directory, plus the coverage baseline under a fixed name so
//! the next comparison can find it.

use crate::coverage::{CoverageBaseline, CoverageReport, BASELINE_FILE_NAME};
use crate::output::aggregate::CrawlSummary;
use crate::output::text::format_text_report;
use crate::output::traits::{OutputError, OutputResult, ReportSink};
use crate::state::CrawlResult;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Timestamp embedded in report file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Files written for one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub summary: PathBuf,
    pub pages: PathBuf,
    /// Only written when some URL failed
    pub failed: Option<PathBuf>,
    /// Only written when some URL was skipped
    pub skipped: Option<PathBuf>,
    pub urlmap: PathBuf,
    pub routes: PathBuf,
    pub report: PathBuf,
    pub baseline: PathBuf,
}

/// Writes crawl reports as JSON and text files
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    directory: PathBuf,
    timestamp: String,
}

impl JsonReportWriter {
    /// Creates a writer stamped with the current local time
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_timestamp(directory, Local::now().format(FILE_TIMESTAMP_FORMAT).to_string())
    }

    pub fn with_timestamp(directory: impl Into<PathBuf>, timestamp: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn stamped(&self, stem: &str, extension: &str) -> PathBuf {
        self.directory
            .join(format!("{}_{}.{}", stem, self.timestamp, extension))
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> OutputResult<()> {
        let json = serde_json::to_string_pretty(value)?;
        write_file(path, &json)
    }
}

fn write_file(path: &Path, content: &str) -> OutputResult<()> {
    fs::write(path, content).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

impl ReportSink for JsonReportWriter {
    type Written = ReportPaths;

    fn write_crawl(
        &self,
        result: &CrawlResult,
        summary: &CrawlSummary,
        baseline: &CoverageBaseline,
    ) -> OutputResult<ReportPaths> {
        fs::create_dir_all(&self.directory)?;

        let paths = ReportPaths {
            summary: self.stamped("summary", "json"),
            pages: self.stamped("pages", "json"),
            failed: (!result.failures.is_empty()).then(|| self.stamped("failed", "json")),
            skipped: (!result.skips.is_empty()).then(|| self.stamped("skipped", "json")),
            urlmap: self.stamped("urlmap", "json"),
            routes: self.stamped("routes", "json"),
            report: self.stamped("report", "txt"),
            baseline: self.directory.join(BASELINE_FILE_NAME),
        };

        self.write_json(&paths.summary, summary)?;
        tracing::info!("Summary: {}", paths.summary.display());

        self.write_json(&paths.pages, &result.pages)?;
        tracing::info!("Pages: {}", paths.pages.display());

        if let Some(path) = &paths.failed {
            self.write_json(path, &result.failures)?;
            tracing::warn!("Failed: {}", path.display());
        }

        if let Some(path) = &paths.skipped {
            self.write_json(path, &result.skips)?;
            tracing::info!("Skipped: {}", path.display());
        }

        self.write_json(&paths.urlmap, &result.provenance)?;
        tracing::info!("URL map: {}", paths.urlmap.display());

        let routes = result.route_records();
        self.write_json(&paths.routes, &routes)?;
        tracing::info!("Routes: {} ({} routes)", paths.routes.display(), routes.len());

        let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        write_file(&paths.report, &format_text_report(result, summary, &generated))?;
        tracing::info!("Report: {}", paths.report.display());

        baseline.save(&paths.baseline)?;
        tracing::info!("Baseline: {}", paths.baseline.display());

        Ok(paths)
    }

    /// Writes `coverage_<timestamp>.json`
    fn write_comparison(&self, report: &CoverageReport) -> OutputResult<()> {
        fs::create_dir_all(&self.directory)?;
        let path = self.stamped("coverage", "json");
        self.write_json(&path, report)?;
        tracing::info!("Comparison: {}", path.display());
        Ok(())
    }
}
