use crate::state::records::{FailureRecord, PageRecord, RouteRecord, SkipRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// Every enqueued URL was processed
    FrontierExhausted,
    /// The configured page ceiling was reached
    PageLimit { limit: usize },
    /// A stop was requested from outside the crawl
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::FrontierExhausted => write!(f, "frontier exhausted"),
            StopReason::PageLimit { limit } => write!(f, "page limit of {} reached", limit),
            StopReason::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Everything one crawl produced, frozen when the loop ends
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(skip)]
    pub elapsed: Duration,
    pub stop_reason: StopReason,

    /// Recorded pages in the order they were processed
    pub pages: Vec<PageRecord>,
    pub failures: Vec<FailureRecord>,
    pub skips: Vec<SkipRecord>,
    /// URLs fetched and parsed whose content was too short to record
    pub discarded: Vec<String>,

    /// Top-level path segment -> recorded pages
    pub categories: BTreeMap<String, usize>,
    /// Routes across all recorded pages, duplicates included
    pub route_total: usize,
    /// Normalized URL -> pages that linked to it, in discovery order
    pub provenance: BTreeMap<String, Vec<String>>,

    /// URLs that were ever enqueued
    pub visited: usize,
    /// URLs still enqueued when the loop stopped
    pub frontier_remaining: usize,
}

impl CrawlResult {
    /// Checks that every visited URL is accounted for exactly once
    pub fn reconciles(&self) -> bool {
        self.visited
            == self.pages.len()
                + self.failures.len()
                + self.skips.len()
                + self.discarded.len()
                + self.frontier_remaining
    }

    /// Expands every recorded page into one record per extracted route
    pub fn route_records(&self) -> Vec<RouteRecord> {
        self.pages
            .iter()
            .flat_map(|page| {
                page.routes.iter().map(move |route| RouteRecord {
                    method: route.method,
                    path: route.path.clone(),
                    found_on: page.url.clone(),
                    page_title: page.title.clone(),
                })
            })
            .collect()
    }

    /// Pages that linked to `url`, first discoverer first
    pub fn linked_from(&self, url: &str) -> &[String] {
        self.provenance
            .get(url)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
