//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] seam
//! - HTML parsing, main-content location and link extraction
//! - API route extraction from page text
//! - Frontier management and request pacing
//! - Overall crawl coordination and progress events

mod coordinator;
mod fetcher;
mod observer;
mod parser;
mod processor;
mod routes;
mod scheduler;

pub use coordinator::{run_audit, Coordinator};
pub use fetcher::{build_http_client, FetchResponse, Fetcher, HttpFetcher, TransportError};
pub use observer::{ChannelObserver, CrawlEvent, CrawlObserver, LogObserver};
pub use parser::{parse_html, ContentLocator, ContentMatcher, ParsedPage, SelectorMatcher};
pub use processor::{PageOutcome, PageProcessor, UNTITLED};
pub use routes::RouteExtractor;
pub use scheduler::{Frontier, QueuedUrl, Scheduler};
