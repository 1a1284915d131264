//! Scheduler for managing the crawl frontier and request pacing
//!
//! This module handles:
//! - The FIFO frontier (breadth-first order)
//! - The visited set, checked before enqueue so a URL enters the frontier once
//! - Link provenance, in discovery order
//! - The pause between consecutive requests

use crate::url::CrawlUrl;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::time::Duration;
use tokio::time::Instant;

/// A URL taken off the frontier, with the first page that linked to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    pub url: CrawlUrl,
    /// None for the seed
    pub parent: Option<String>,
}

/// Queue, visited set and provenance map of one crawl
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlUrl>,
    visited: HashSet<CrawlUrl>,
    provenance: HashMap<CrawlUrl, Vec<String>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` visited and appends it to the queue
    ///
    /// Returns false, leaving the queue untouched, if the URL was already
    /// visited.
    pub fn enqueue(&mut self, url: CrawlUrl) -> bool {
        if self.visited.contains(&url) {
            return false;
        }
        self.visited.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Takes the earliest enqueued URL
    pub fn pop(&mut self) -> Option<QueuedUrl> {
        let url = self.queue.pop_front()?;
        let parent = self
            .provenance
            .get(&url)
            .and_then(|parents| parents.first())
            .cloned();
        Some(QueuedUrl { url, parent })
    }

    /// Records that `from` links to `target`
    pub fn record_link(&mut self, target: &CrawlUrl, from: &str) {
        self.provenance
            .entry(target.clone())
            .or_default()
            .push(from.to_string());
    }

    pub fn is_visited(&self, url: &CrawlUrl) -> bool {
        self.visited.contains(url)
    }

    /// Pages linking to `url`, first discoverer first
    pub fn provenance_of(&self, url: &CrawlUrl) -> Option<&[String]> {
        self.provenance.get(url).map(Vec::as_slice)
    }

    /// Number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Provenance as an ordered map of plain strings
    pub fn provenance_map(&self) -> BTreeMap<String, Vec<String>> {
        self.provenance
            .iter()
            .map(|(url, parents)| (url.to_string(), parents.clone()))
            .collect()
    }
}

/// Scheduler owns the frontier and paces requests
///
/// At most one URL is handed out at a time; the next one is released only
/// once `delay` has passed since the previous URL finished processing.
#[derive(Debug)]
pub struct Scheduler {
    frontier: Frontier,
    delay: Duration,
    last_completed: Option<Instant>,
}

impl Scheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            frontier: Frontier::new(),
            delay,
            last_completed: None,
        }
    }

    /// Marks the seed visited and enqueues it
    pub fn seed(&mut self, url: CrawlUrl) {
        self.frontier.enqueue(url);
    }

    /// Gets the next URL to fetch, waiting out the crawl delay first
    ///
    /// # Returns
    ///
    /// * `Some(QueuedUrl)` - A URL that's ready to fetch
    /// * `None` - The frontier is empty
    pub async fn next_url(&mut self) -> Option<QueuedUrl> {
        if self.frontier.is_empty() {
            return None;
        }

        if let Some(wait) = self.time_until_next_request(Instant::now()) {
            tracing::trace!("Waiting {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }

        self.frontier.pop()
    }

    /// Records that the URL handed out last has been fully processed
    pub fn record_completion(&mut self) {
        self.last_completed = Some(Instant::now());
    }

    /// Enqueues every candidate not yet visited, in order
    ///
    /// # Returns
    ///
    /// The number of URLs added to the frontier
    pub fn expand(&mut self, candidates: Vec<CrawlUrl>) -> usize {
        candidates
            .into_iter()
            .filter(|url| self.frontier.enqueue(url.clone()))
            .count()
    }

    fn time_until_next_request(&self, now: Instant) -> Option<Duration> {
        let ready_at = self.last_completed? + self.delay;
        (ready_at > now).then(|| ready_at - now)
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn frontier_mut(&mut self) -> &mut Frontier {
        &mut self.frontier
    }

    /// Returns the number of URLs in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }
}
