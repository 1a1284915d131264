//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl state machine that ties the pieces
//! together:
//! - Seeding the frontier
//! - Handing each dequeued URL to the page processor
//! - Committing pages that clear the minimum content length
//! - Expanding the frontier with newly discovered in-scope links
//! - Stopping on an empty frontier, the page ceiling, or a stop request
//!
//! Exactly one URL is in flight at a time. A stop request or the page
//! ceiling is checked between processing steps and never aborts a fetch.

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::observer::{CrawlEvent, CrawlObserver, LogObserver};
use crate::crawler::processor::{PageOutcome, PageProcessor};
use crate::crawler::routes::RouteExtractor;
use crate::crawler::scheduler::Scheduler;
use crate::state::{CrawlResult, FailureRecord, PageRecord, SkipRecord, StopReason};
use crate::url::{normalize, CrawlUrl, ScopeFilter};
use crate::{AuditError, Result};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

/// Committed pages between progress events
const PROGRESS_INTERVAL: usize = 10;

/// Main crawler coordinator structure
pub struct Coordinator<F> {
    seed: CrawlUrl,
    scheduler: Scheduler,
    processor: PageProcessor<F>,
    observers: Vec<Box<dyn CrawlObserver>>,
    max_pages: Option<usize>,
    min_content_length: usize,
    stop: Arc<AtomicBool>,
}

/// Accumulators filled while the crawl runs
#[derive(Default)]
struct Tally {
    pages: Vec<PageRecord>,
    failures: Vec<FailureRecord>,
    skips: Vec<SkipRecord>,
    discarded: Vec<String>,
    categories: BTreeMap<String, usize>,
    route_total: usize,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(AuditError)` - The HTTP client, scope or route pattern could not be built
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(config)?;
        Self::new(config, fetcher)
    }
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a new coordinator instance around any fetcher
    pub fn new(config: &Config, fetcher: F) -> Result<Self> {
        let scope = ScopeFilter::from_config(config)?;
        let routes = RouteExtractor::new(&config.extraction.route_prefix)?;

        Ok(Self {
            seed: normalize(&config.crawler.base_url),
            scheduler: Scheduler::new(config.crawler.crawl_delay()),
            processor: PageProcessor::new(fetcher, scope, routes),
            observers: Vec::new(),
            max_pages: config.crawler.max_pages,
            min_content_length: config.crawler.min_content_length,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Registers an observer for crawl events
    pub fn with_observer(mut self, observer: impl CrawlObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Overrides the configured page ceiling
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Flag that stops the crawl before the next URL is dequeued once set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    fn emit(&self, event: CrawlEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }

    /// Runs the crawl to completion
    ///
    /// Per-page failures never end the crawl; they are recorded and the loop
    /// moves on. The only per-page error returned is a transport failure on
    /// the seed, since nothing else can be discovered without it.
    pub async fn run(mut self) -> Result<CrawlResult> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let mut tally = Tally::default();

        self.scheduler.seed(self.seed.clone());
        self.emit(CrawlEvent::Started {
            seed: self.seed.to_string(),
            max_pages: self.max_pages,
        });

        let stop_reason = loop {
            if let Some(limit) = self.max_pages {
                if tally.pages.len() >= limit {
                    break StopReason::PageLimit { limit };
                }
            }

            if self.stop.load(Ordering::SeqCst) {
                tracing::info!("Stop requested, ending crawl");
                break StopReason::Interrupted;
            }

            let Some(queued) = self.scheduler.next_url().await else {
                break StopReason::FrontierExhausted;
            };

            self.emit(CrawlEvent::Fetching {
                url: queued.url.to_string(),
                parent: queued.parent.clone(),
            });

            let outcome = self
                .processor
                .process(
                    &queued.url,
                    queued.parent.as_deref(),
                    self.scheduler.frontier_mut(),
                )
                .await;

            if queued.url == self.seed && outcome.is_transport_failure() {
                if let PageOutcome::Failed(record) = &outcome {
                    return Err(AuditError::SeedUnreachable {
                        url: record.url.clone(),
                        reason: record.cause.to_string(),
                    });
                }
            }

            match outcome {
                PageOutcome::Page { record, candidates } => {
                    self.commit(record, &mut tally, clock);
                    let added = self.scheduler.expand(candidates);
                    tracing::trace!("{} new URLs queued", added);
                }
                PageOutcome::Failed(record) => {
                    self.emit(CrawlEvent::Failed {
                        url: record.url.clone(),
                        cause: record.cause.clone(),
                    });
                    tally.failures.push(record);
                }
                PageOutcome::Skipped(record) => {
                    self.emit(CrawlEvent::Skipped {
                        url: record.url.clone(),
                        reason: record.reason,
                    });
                    tally.skips.push(record);
                }
            }

            self.scheduler.record_completion();
        };

        let elapsed = clock.elapsed();
        self.emit(CrawlEvent::Finished {
            pages: tally.pages.len(),
            failures: tally.failures.len(),
            skips: tally.skips.len(),
            routes: tally.route_total,
            elapsed_secs: elapsed.as_secs_f64(),
            stop_reason,
        });

        let frontier = self.scheduler.frontier();
        Ok(CrawlResult {
            seed: self.seed.into_string(),
            started_at,
            finished_at: Utc::now(),
            elapsed,
            stop_reason,
            pages: tally.pages,
            failures: tally.failures,
            skips: tally.skips,
            discarded: tally.discarded,
            categories: tally.categories,
            route_total: tally.route_total,
            provenance: frontier.provenance_map(),
            visited: frontier.visited_count(),
            frontier_remaining: frontier.len(),
        })
    }

    /// Records the page if its content is long enough, otherwise discards it
    fn commit(&self, record: PageRecord, tally: &mut Tally, clock: Instant) {
        if record.content_length <= self.min_content_length {
            self.emit(CrawlEvent::PageDiscarded {
                url: record.url.clone(),
                content_length: record.content_length,
            });
            tally.discarded.push(record.url);
            return;
        }

        *tally.categories.entry(record.category.clone()).or_insert(0) += 1;
        tally.route_total += record.routes_found;

        self.emit(CrawlEvent::PageRecorded {
            url: record.url.clone(),
            content_length: record.content_length,
            routes: record.routes_found,
            category: record.category.clone(),
        });
        tally.pages.push(record);

        if tally.pages.len() % PROGRESS_INTERVAL == 0 {
            let frontier = self.scheduler.frontier();
            let secs = clock.elapsed().as_secs_f64();
            self.emit(CrawlEvent::Progress {
                pages: tally.pages.len(),
                queued: frontier.len(),
                visited: frontier.visited_count(),
                pages_per_sec: if secs > 0.0 {
                    tally.pages.len() as f64 / secs
                } else {
                    0.0
                },
            });
        }
    }
}

/// Runs a complete audit crawl over HTTP, logging progress
///
/// # Example
///
/// ```no_run
/// use docsweep::config::load_config;
/// use docsweep::crawler::run_audit;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("audit.toml"))?;
/// let result = run_audit(&config).await?;
/// println!("{} pages recorded", result.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_audit(config: &Config) -> Result<CrawlResult> {
    Coordinator::from_config(config)?
        .with_observer(LogObserver)
        .run()
        .await
}
