//! Crawl progress hooks
//!
//! The coordinator reports every step as a [`CrawlEvent`]. Observers only
//! watch; nothing they do feeds back into the crawl. The command-line driver
//! logs events through [`LogObserver`], and a dashboard can consume the same
//! stream through [`ChannelObserver`].

use crate::state::{FailureCause, SkipReason, StopReason};
use tokio::sync::mpsc::UnboundedSender;

/// One observable step of a crawl
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    Started {
        seed: String,
        max_pages: Option<usize>,
    },
    Fetching {
        url: String,
        parent: Option<String>,
    },
    PageRecorded {
        url: String,
        content_length: usize,
        routes: usize,
        category: String,
    },
    PageDiscarded {
        url: String,
        content_length: usize,
    },
    Failed {
        url: String,
        cause: FailureCause,
    },
    Skipped {
        url: String,
        reason: SkipReason,
    },
    Progress {
        pages: usize,
        queued: usize,
        visited: usize,
        pages_per_sec: f64,
    },
    Finished {
        pages: usize,
        failures: usize,
        skips: usize,
        routes: usize,
        elapsed_secs: f64,
        stop_reason: StopReason,
    },
}

/// Receives crawl events
pub trait CrawlObserver: Send + Sync {
    fn on_event(&self, event: &CrawlEvent);
}

/// Writes crawl events to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl CrawlObserver for LogObserver {
    fn on_event(&self, event: &CrawlEvent) {
        match event {
            CrawlEvent::Started { seed, max_pages } => match max_pages {
                Some(limit) => tracing::info!("Starting crawl of {} (limit {} pages)", seed, limit),
                None => tracing::info!("Starting crawl of {}", seed),
            },
            CrawlEvent::Fetching { url, .. } => tracing::debug!("Crawling: {}", url),
            CrawlEvent::PageRecorded {
                url,
                content_length,
                routes,
                category,
            } => tracing::info!(
                "{}: {} chars, {} routes, category: {}",
                url,
                content_length,
                routes,
                category
            ),
            CrawlEvent::PageDiscarded {
                url,
                content_length,
            } => tracing::debug!("{}: only {} chars, not recorded", url, content_length),
            CrawlEvent::Failed { url, cause } => tracing::warn!("{}: {}", url, cause),
            CrawlEvent::Skipped { url, reason } => tracing::info!("{}: skipped ({})", url, reason),
            CrawlEvent::Progress {
                pages,
                queued,
                visited,
                pages_per_sec,
            } => tracing::info!(
                "Progress: {} pages, {} in queue, {} visited, {:.2} pages/sec",
                pages,
                queued,
                visited,
                pages_per_sec
            ),
            CrawlEvent::Finished {
                pages,
                failures,
                skips,
                routes,
                elapsed_secs,
                stop_reason,
            } => tracing::info!(
                "Crawl complete in {:.1}s: {} pages, {} failed, {} skipped, {} API routes ({})",
                elapsed_secs,
                pages,
                failures,
                skips,
                routes,
                stop_reason
            ),
        }
    }
}

/// Forwards crawl events over a channel
///
/// A closed receiver is ignored, so a dashboard going away never stops the
/// crawl.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: UnboundedSender<CrawlEvent>,
}

impl ChannelObserver {
    pub fn new(sender: UnboundedSender<CrawlEvent>) -> Self {
        Self { sender }
    }
}

impl CrawlObserver for ChannelObserver {
    fn on_event(&self, event: &CrawlEvent) {
        let _ = self.sender.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_channel_observer_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let observer = ChannelObserver::new(tx);

        let event = CrawlEvent::Skipped {
            url: "https://h/file.yaml".to_string(),
            reason: SkipReason::NotHtml,
        };
        observer.on_event(&event);

        assert_eq!(rx.try_recv().unwrap(), event);
    }

    #[test]
    fn test_channel_observer_survives_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let observer = ChannelObserver::new(tx);
        observer.on_event(&CrawlEvent::Fetching {
            url: "https://h".to_string(),
            parent: None,
        });
    }
}
