use crate::coverage::{read_json, ComparisonError, ComparisonResult, CoverageBaseline};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// What the other system reports about its own scrape
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ObservedCoverage {
    #[serde(default)]
    pub pages_count: usize,
    #[serde(default)]
    pub routes_count: Option<usize>,
    #[serde(default)]
    pub chunks_count: usize,
    #[serde(default)]
    pub vectors_count: usize,
}

impl ObservedCoverage {
    pub fn with_pages(pages_count: usize) -> Self {
        Self {
            pages_count,
            ..Self::default()
        }
    }

    /// Loads the other system's metadata file; unknown keys are ignored
    pub fn load(path: &Path) -> ComparisonResult<Self> {
        read_json(path, ComparisonError::MissingObserved)
    }
}

/// Coverage band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    /// 95% or more
    Excellent,
    /// 80% up to 95%
    Good,
    Incomplete,
}

impl CoverageStatus {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 95.0 {
            CoverageStatus::Excellent
        } else if percentage >= 80.0 {
            CoverageStatus::Good
        } else {
            CoverageStatus::Incomplete
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageStatus::Excellent => "excellent",
            CoverageStatus::Good => "good",
            CoverageStatus::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking observed coverage against a baseline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub expected_pages: usize,
    pub observed_pages: usize,
    pub percentage: f64,
    pub status: CoverageStatus,
    pub expected_routes: usize,
    /// None when the other system does not track routes
    pub observed_routes: Option<usize>,
    pub chunks: usize,
    pub vectors: usize,
}

/// Compares observed page counts against the baseline
///
/// More observed pages than expected is valid and yields a percentage above
/// 100. A baseline expecting no pages yields 0%.
///
/// # Examples
///
/// ```
/// use docsweep::coverage::{compare, CoverageBaseline, CoverageStatus, ObservedCoverage};
///
/// let baseline = CoverageBaseline {
///     expected_minimum_pages: 100,
///     expected_minimum_routes: 0,
///     categories: vec![],
///     sample_urls: vec![],
///     validation_timestamp: "20240101_120000".to_string(),
/// };
/// let report = compare(&baseline, &ObservedCoverage::with_pages(82));
/// assert_eq!(report.status, CoverageStatus::Good);
/// ```
pub fn compare(baseline: &CoverageBaseline, observed: &ObservedCoverage) -> CoverageReport {
    let expected = baseline.expected_minimum_pages;
    let percentage = if expected == 0 {
        0.0
    } else {
        observed.pages_count as f64 / expected as f64 * 100.0
    };

    CoverageReport {
        expected_pages: expected,
        observed_pages: observed.pages_count,
        percentage,
        status: CoverageStatus::from_percentage(percentage),
        expected_routes: baseline.expected_minimum_routes,
        observed_routes: observed.routes_count,
        chunks: observed.chunks_count,
        vectors: observed.vectors_count,
    }
}

/// Loads both files and compares them
pub fn compare_files(baseline: &Path, observed: &Path) -> ComparisonResult<CoverageReport> {
    let baseline = CoverageBaseline::load(baseline)?;
    let observed = ObservedCoverage::load(observed)?;
    Ok(compare(&baseline, &observed))
}
