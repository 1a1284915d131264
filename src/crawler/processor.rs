//! Single page processing
//!
//! Fetches one URL, classifies the response, and turns an HTML page into a
//! candidate [`PageRecord`] plus the in-scope links it points at.

use crate::crawler::fetcher::{Fetcher, TransportError};
use crate::crawler::parser::{parse_html, ContentLocator};
use crate::crawler::routes::RouteExtractor;
use crate::crawler::scheduler::Frontier;
use crate::state::{FailureCause, FailureRecord, PageRecord, SkipReason, SkipRecord};
use crate::url::{category_of, normalize, resolve_href, CrawlUrl, ScopeFilter};
use chrono::Utc;

/// Title used when a page has no `<title>`
pub const UNTITLED: &str = "Untitled";

/// Result of processing one URL
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// HTML page parsed; the record is committed only if it has enough content
    Page {
        record: PageRecord,
        /// In-scope links not yet visited when the page was parsed
        candidates: Vec<CrawlUrl>,
    },
    /// Fetch failed or returned a non-2xx status
    Failed(FailureRecord),
    /// Fetch succeeded but the payload cannot be processed
    Skipped(SkipRecord),
}

impl PageOutcome {
    /// True when the request never got an HTTP response
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            PageOutcome::Failed(FailureRecord {
                cause: FailureCause::Timeout | FailureCause::Transport { .. },
                ..
            })
        )
    }
}

/// Fetches and extracts pages
pub struct PageProcessor<F> {
    fetcher: F,
    scope: ScopeFilter,
    routes: RouteExtractor,
    locator: ContentLocator,
}

impl<F: Fetcher> PageProcessor<F> {
    pub fn new(fetcher: F, scope: ScopeFilter, routes: RouteExtractor) -> Self {
        Self {
            fetcher,
            scope,
            routes,
            locator: ContentLocator::default(),
        }
    }

    /// Replaces the main-content matchers
    pub fn with_locator(mut self, locator: ContentLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn scope(&self) -> &ScopeFilter {
        &self.scope
    }

    /// Processes one URL
    ///
    /// Every link on the page is resolved against `url`, normalized and
    /// recorded in the frontier's provenance, in scope or not. Only in-scope
    /// links the frontier has not seen are returned as candidates.
    pub async fn process(
        &self,
        url: &CrawlUrl,
        parent: Option<&str>,
        frontier: &mut Frontier,
    ) -> PageOutcome {
        let failed = |cause: FailureCause| {
            PageOutcome::Failed(FailureRecord {
                url: url.to_string(),
                cause,
                parent_url: parent.map(str::to_string),
            })
        };

        let page_url = match url.to_url() {
            Ok(u) => u,
            Err(e) => {
                return failed(FailureCause::Transport {
                    error: e.to_string(),
                })
            }
        };

        let response = match self.fetcher.fetch(&page_url).await {
            Ok(response) => response,
            Err(TransportError::Timeout) => return failed(FailureCause::Timeout),
            Err(e) => {
                return failed(FailureCause::Transport {
                    error: e.to_string(),
                })
            }
        };

        if !response.is_success() {
            return failed(FailureCause::Status {
                status: response.status,
            });
        }

        if !response.is_html() {
            return PageOutcome::Skipped(SkipRecord {
                url: url.to_string(),
                reason: SkipReason::NotHtml,
                content_type: response.content_type,
                title: None,
            });
        }

        let parsed = parse_html(&response.body, &self.locator);

        let Some(text) = parsed.main_text else {
            return PageOutcome::Skipped(SkipRecord {
                url: url.to_string(),
                reason: SkipReason::NoMainContent,
                content_type: response.content_type,
                title: parsed.title,
            });
        };

        let routes = self.routes.extract(&text);

        let mut candidates = Vec::new();
        for href in &parsed.links {
            let Some(absolute) = resolve_href(&page_url, href) else {
                continue;
            };
            let target = normalize(absolute.as_str());
            frontier.record_link(&target, url.as_str());

            if self.scope.in_scope(&target) && !frontier.is_visited(&target) {
                candidates.push(target);
            }
        }

        tracing::trace!(
            "{} matched by {:?}, {} links, {} candidates",
            url,
            parsed.matched_by,
            parsed.links.len(),
            candidates.len()
        );

        let record = PageRecord {
            url: url.to_string(),
            title: parsed.title.unwrap_or_else(|| UNTITLED.to_string()),
            content_length: text.chars().count(),
            word_count: text.split_whitespace().count(),
            category: category_of(&page_url),
            routes_found: routes.len(),
            routes,
            parent_url: parent.map(str::to_string),
            crawled_at: Utc::now(),
        };

        PageOutcome::Page { record, candidates }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::crawler::fetcher::FetchResponse;
    use crate::state::Method;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use url::Url;

    /// Serves canned responses keyed by URL
    #[derive(Default)]
    pub(crate) struct StaticFetcher {
        responses: HashMap<String, Result<FetchResponse, TransportError>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StaticFetcher {
        /// Every URL fetched so far, in request order
        pub(crate) fn request_log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.requests)
        }

        pub(crate) fn html(mut self, url: &str, body: &str) -> Self {
            self.responses.insert(
                url.to_string(),
                Ok(FetchResponse {
                    final_url: url.to_string(),
                    status: 200,
                    content_type: Some("text/html; charset=utf-8".to_string()),
                    body: body.to_string(),
                }),
            );
            self
        }

        pub(crate) fn status(mut self, url: &str, status: u16, content_type: &str) -> Self {
            self.responses.insert(
                url.to_string(),
                Ok(FetchResponse {
                    final_url: url.to_string(),
                    status,
                    content_type: Some(content_type.to_string()),
                    body: String::new(),
                }),
            );
            self
        }

        pub(crate) fn error(mut self, url: &str, error: TransportError) -> Self {
            self.responses.insert(url.to_string(), Err(error));
            self
        }
    }

    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchResponse, TransportError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url.as_str())
                .cloned()
                .unwrap_or_else(|| {
                    Ok(FetchResponse {
                        final_url: url.to_string(),
                        status: 404,
                        content_type: Some("text/html".to_string()),
                        body: String::new(),
                    })
                })
        }
    }

    pub(crate) fn processor(fetcher: StaticFetcher) -> PageProcessor<StaticFetcher> {
        let scope = ScopeFilter::new(
            "h.test",
            vec![".png".to_string(), ".css".to_string()],
            vec!["/_static/".to_string()],
        );
        PageProcessor::new(fetcher, scope, RouteExtractor::new("/d2l/api/").unwrap())
    }

    const USERS_PAGE: &str = r##"<html><head><title>Users</title></head><body>
        <nav><a href="/index.html">Home</a></nav>
        <div role="main">
          <h1>Users</h1>
          <p>GET /d2l/api/lp/1.0/users/{userId}</p>
          <p>post /d2l/api/le/1.1/enrollments</p>
          <a href="enroll.html#create">Enrollments</a>
          <a href="#top">Top</a>
          <a href="mailto:docs@h.test">Mail</a>
          <a href="/_static/logo.png">Logo</a>
          <a href="https://other.test/page">Elsewhere</a>
        </div></body></html>"##;

    #[tokio::test]
    async fn test_processes_html_page() {
        let fetcher = StaticFetcher::default().html("https://h.test/res/user.html", USERS_PAGE);
        let processor = processor(fetcher);
        let mut frontier = Frontier::new();

        let url = normalize("https://h.test/res/user.html");
        let outcome = processor
            .process(&url, Some("https://h.test"), &mut frontier)
            .await;

        let PageOutcome::Page { record, candidates } = outcome else {
            panic!("expected a page, got {:?}", outcome);
        };

        assert_eq!(record.title, "Users");
        assert_eq!(record.category, "res");
        assert_eq!(record.parent_url.as_deref(), Some("https://h.test"));
        assert_eq!(record.routes_found, 2);
        assert_eq!(record.routes[1].method, Method::Post);
        assert_eq!(record.word_count, 10);
        assert_eq!(
            record.content_length,
            "Users\nGET /d2l/api/lp/1.0/users/{userId}\npost /d2l/api/le/1.1/enrollments\nEnrollments\nTop\nMail\nLogo\nElsewhere"
                .chars()
                .count()
        );

        assert_eq!(
            candidates,
            vec![normalize("https://h.test"), normalize("https://h.test/res/enroll.html")]
        );

        // Provenance covers out-of-scope links too
        assert_eq!(
            frontier.provenance_of(&normalize("https://other.test/page")),
            Some(&["https://h.test/res/user.html".to_string()][..])
        );
        assert!(frontier
            .provenance_of(&normalize("https://h.test/_static/logo.png"))
            .is_some());
    }

    #[tokio::test]
    async fn test_visited_links_are_not_candidates() {
        let fetcher = StaticFetcher::default().html("https://h.test/res/user.html", USERS_PAGE);
        let processor = processor(fetcher);
        let mut frontier = Frontier::new();
        frontier.enqueue(normalize("https://h.test/res/enroll.html"));

        let url = normalize("https://h.test/res/user.html");
        let PageOutcome::Page { candidates, .. } = processor.process(&url, None, &mut frontier).await
        else {
            panic!("expected a page");
        };

        assert_eq!(candidates, vec![normalize("https://h.test")]);
    }

    #[tokio::test]
    async fn test_untitled_page() {
        let fetcher = StaticFetcher::default()
            .html("https://h.test/about.html", "<html><body><p>About</p></body></html>");
        let processor = processor(fetcher);
        let mut frontier = Frontier::new();

        let url = normalize("https://h.test/about.html");
        let PageOutcome::Page { record, .. } = processor.process(&url, None, &mut frontier).await
        else {
            panic!("expected a page");
        };
        assert_eq!(record.title, UNTITLED);
        assert_eq!(record.category, "root");
    }

    #[tokio::test]
    async fn test_non_success_status_is_failure() {
        let processor = processor(StaticFetcher::default());
        let mut frontier = Frontier::new();

        let url = normalize("https://h.test/missing.html");
        let outcome = processor
            .process(&url, Some("https://h.test"), &mut frontier)
            .await;

        match outcome {
            PageOutcome::Failed(record) => {
                assert_eq!(record.cause, FailureCause::Status { status: 404 });
                assert_eq!(record.parent_url.as_deref(), Some("https://h.test"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_errors_are_failures() {
        let fetcher = StaticFetcher::default()
            .error("https://h.test/slow.html", TransportError::Timeout)
            .error(
                "https://h.test/down.html",
                TransportError::Connect("connection refused".to_string()),
            );
        let processor = processor(fetcher);
        let mut frontier = Frontier::new();

        let slow = processor
            .process(&normalize("https://h.test/slow.html"), None, &mut frontier)
            .await;
        assert!(slow.is_transport_failure());
        assert!(matches!(
            slow,
            PageOutcome::Failed(FailureRecord {
                cause: FailureCause::Timeout,
                ..
            })
        ));

        let down = processor
            .process(&normalize("https://h.test/down.html"), None, &mut frontier)
            .await;
        assert!(down.is_transport_failure());
    }

    #[tokio::test]
    async fn test_non_html_is_skipped() {
        let fetcher =
            StaticFetcher::default().status("https://h.test/spec.yaml", 200, "application/yaml");
        let processor = processor(fetcher);
        let mut frontier = Frontier::new();

        let outcome = processor
            .process(&normalize("https://h.test/spec.yaml"), None, &mut frontier)
            .await;

        match outcome {
            PageOutcome::Skipped(record) => {
                assert_eq!(record.reason, SkipReason::NotHtml);
                assert_eq!(record.content_type.as_deref(), Some("application/yaml"));
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_main_content_is_skipped() {
        let fetcher = StaticFetcher::default().html(
            "https://h.test/odd.html",
            "<html><head><title>Odd</title></head><body><p>No article</p></body></html>",
        );
        let processor =
            processor(fetcher).with_locator(ContentLocator::from_selectors(&["article"]));
        let mut frontier = Frontier::new();

        let outcome = processor
            .process(&normalize("https://h.test/odd.html"), None, &mut frontier)
            .await;

        match outcome {
            PageOutcome::Skipped(record) => {
                assert_eq!(record.reason, SkipReason::NoMainContent);
                assert_eq!(record.title.as_deref(), Some("Odd"));
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }
}
