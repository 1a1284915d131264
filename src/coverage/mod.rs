//! Coverage baseline and comparison
//!
//! A finished crawl is frozen into a [`CoverageBaseline`] that a second
//! system's scrape can be checked against. Comparison reads that baseline and
//! the other system's metadata file and reports how much of the expected
//! site the other system saw.

mod baseline;
mod compare;

pub use baseline::CoverageBaseline;
pub use compare::{compare, compare_files, CoverageReport, CoverageStatus, ObservedCoverage};

use std::path::PathBuf;
use thiserror::Error;

/// File name of the baseline inside the output directory
pub const BASELINE_FILE_NAME: &str = "expected_coverage.json";

/// Errors that abort a comparison
///
/// None of these affect a crawl; they only mean the two sides could not be
/// compared.
#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("No coverage baseline at {0}; run an audit first")]
    MissingBaseline(PathBuf),

    #[error("Observed metadata file not found: {0}")]
    MissingObserved(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for comparison operations
pub type ComparisonResult<T> = Result<T, ComparisonError>;

/// Reads and deserializes a JSON file, mapping a missing file with `missing`
fn read_json<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
    missing: fn(PathBuf) -> ComparisonError,
) -> ComparisonResult<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(missing(path.to_path_buf()))
        }
        Err(source) => {
            return Err(ComparisonError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&content).map_err(|source| ComparisonError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
