//! State module for crawl records
//!
//! This module holds the values a crawl accumulates and hands to reporting.
//!
//! # Components
//!
//! - `PageRecord`, `FailureRecord`, `SkipRecord`: one per processed URL outcome
//! - `Route`, `RouteRecord`: documented API endpoints
//! - `CrawlResult`: the frozen output of one crawl

mod records;
mod result;

// Re-export main types
pub use records::{
    FailureCause, FailureRecord, Method, PageRecord, Route, RouteRecord, SkipReason, SkipRecord,
};
pub use result::{CrawlResult, StopReason};
