//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full audit cycle end-to-end: crawl, reports and comparison.

use docsweep::config::Config;
use docsweep::coverage::{compare_files, CoverageStatus};
use docsweep::crawler::{ChannelObserver, Coordinator, CrawlEvent};
use docsweep::output::{write_reports, JsonReportWriter};
use docsweep::state::{FailureCause, SkipReason, StopReason};
use docsweep::AuditError;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Long enough to clear the default minimum content length
const USERS_TEXT: &str = "Users. GET /d2l/api/lp/1.0/users/{userId} retrieves a user. \
     DELETE /d2l/api/lp/1.0/users/{userId} removes the user from the organization.";

/// Creates a test configuration crawling the mock server without delay
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::for_base_url(base_url);
    config.crawler.crawl_delay_ms = 0;
    config.crawler.timeout_secs = 5;
    config
}

/// A documentation page with `text` as main content and `links` in the nav
fn doc_page(title: &str, text: &str, links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();
    format!(
        r#"<html><head><title>{}</title></head><body>
           <nav><ul>{}</ul></nav>
           <div class="document"><div role="main"><p>{}</p></div></div>
           </body></html>"#,
        title, anchors, text
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_audit_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let port = mock_server.address().port();

    // Index page linking to every kind of target
    mount_page(
        &mock_server,
        "/",
        doc_page(
            "Home",
            &"Welcome to the documentation home page. ".repeat(4),
            &[
                "/res/users.html".to_string(),
                "/res/users.html#section".to_string(),
                "/basic/".to_string(),
                "/index.html".to_string(),
                "/spec.yaml".to_string(),
                "/missing.html".to_string(),
                "/_static/app.css".to_string(),
                format!("http://localhost:{}/elsewhere.html", port),
                "mailto:docs@example.com".to_string(),
            ],
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/res/users.html",
        doc_page(
            "Users",
            USERS_TEXT,
            &["/".to_string(), "/basic/index.html".to_string()],
        ),
    )
    .await;

    // Visited, but too short to record
    mount_page(
        &mock_server,
        "/basic",
        doc_page("Basics", "Short page.", &["/res/users.html".to_string()]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/spec.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("openapi: 3.0.0", "application/yaml"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Out of scope: never fetched
    for route in ["/_static/app.css", "/elsewhere.html"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&base_url);
    let result = Coordinator::from_config(&config)
        .unwrap()
        .run()
        .await
        .expect("Crawl failed");

    let urls: Vec<_> = result.pages.iter().map(|p| p.url.clone()).collect();
    assert_eq!(urls, vec![base_url.clone(), format!("{}/res/users.html", base_url)]);

    let users = &result.pages[1];
    assert_eq!(users.title, "Users");
    assert_eq!(users.category, "res");
    assert_eq!(users.parent_url.as_deref(), Some(base_url.as_str()));
    assert_eq!(users.routes_found, 2);
    assert_eq!(result.route_total, 2);

    assert_eq!(result.discarded, vec![format!("{}/basic", base_url)]);

    assert_eq!(result.skips.len(), 1);
    assert_eq!(result.skips[0].reason, SkipReason::NotHtml);

    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].url, format!("{}/missing.html", base_url));
    assert_eq!(result.failures[0].cause, FailureCause::Status { status: 404 });

    assert_eq!(result.visited, 5);
    assert_eq!(result.stop_reason, StopReason::FrontierExhausted);
    assert!(result.reconciles());

    assert_eq!(result.categories.get("root"), Some(&1));
    assert_eq!(result.categories.get("res"), Some(&1));
    assert_eq!(result.categories.get("basic"), None);

    // Both users links from the index page plus the one from /basic
    assert_eq!(
        result.linked_from(&format!("{}/res/users.html", base_url)).len(),
        3
    );
}

#[tokio::test]
async fn test_crawl_respects_page_ceiling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: Vec<String> = (1..=5).map(|i| format!("/res/page{}.html", i)).collect();
    mount_page(&mock_server, "/", doc_page("Home", USERS_TEXT, &links)).await;

    Mock::given(method("GET"))
        .and(path("/res/page1.html"))
        .respond_with(html(doc_page("Page 1", USERS_TEXT, &[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Never reached: the ceiling is hit after the first linked page
    Mock::given(method("GET"))
        .and(path("/res/page2.html"))
        .respond_with(html(doc_page("Page 2", USERS_TEXT, &[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.crawler.max_pages = Some(2);

    let result = Coordinator::from_config(&config)
        .unwrap()
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(result.pages.len(), 2);
    assert_eq!(result.stop_reason, StopReason::PageLimit { limit: 2 });
    assert_eq!(result.frontier_remaining, 4);
    assert!(result.reconciles());
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        doc_page("Home", USERS_TEXT, &["/old.html".to_string()]),
    )
    .await;

    let location = format!("{}/new.html", base_url);
    Mock::given(method("GET"))
        .and(path("/old.html"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/new.html", doc_page("New", USERS_TEXT, &[])).await;

    let result = Coordinator::from_config(&create_test_config(&base_url))
        .unwrap()
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(result.pages.len(), 2);
    assert_eq!(result.pages[1].url, format!("{}/old.html", base_url));
    assert_eq!(result.pages[1].title, "New");
}

#[tokio::test]
async fn test_unreachable_seed_is_fatal() {
    // Nothing listens on port 1
    let config = create_test_config("http://127.0.0.1:1");

    let result = Coordinator::from_config(&config).unwrap().run().await;

    assert!(matches!(result, Err(AuditError::SeedUnreachable { .. })));
}

#[tokio::test]
async fn test_observer_receives_events() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        doc_page("Home", USERS_TEXT, &["/gone.html".to_string()]),
    )
    .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    Coordinator::from_config(&create_test_config(&base_url))
        .unwrap()
        .with_observer(ChannelObserver::new(tx))
        .run()
        .await
        .expect("Crawl failed");

    let mut recorded = 0;
    let mut failed = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            CrawlEvent::PageRecorded { .. } => recorded += 1,
            CrawlEvent::Failed { .. } => failed += 1,
            _ => {}
        }
    }
    assert_eq!(recorded, 1);
    assert_eq!(failed, 1);
}

#[tokio::test]
async fn test_reports_and_comparison() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: Vec<String> = (1..=3).map(|i| format!("/res/page{}.html", i)).collect();
    mount_page(&mock_server, "/", doc_page("Home", USERS_TEXT, &links)).await;
    for (i, link) in links.iter().enumerate() {
        mount_page(
            &mock_server,
            link,
            doc_page(&format!("Page {}", i + 1), USERS_TEXT, &[]),
        )
        .await;
    }

    let result = Coordinator::from_config(&create_test_config(&base_url))
        .unwrap()
        .run()
        .await
        .expect("Crawl failed");
    assert_eq!(result.pages.len(), 4);

    let dir = TempDir::new().unwrap();
    let writer = JsonReportWriter::with_timestamp(dir.path(), "20240101_120000");
    let paths = write_reports(&writer, &result, "20240101_120000", Some("cafe".to_string()))
        .expect("Failed to write reports");

    assert!(paths.summary.exists());
    assert!(paths.report.exists());
    assert!(paths.failed.is_none());

    let report_text = std::fs::read_to_string(&paths.report).unwrap();
    assert!(report_text.contains("Total Pages Scraped: 4"));
    assert!(report_text.contains("API Routes Found: 8"));

    let metadata = dir.path().join("scrape_metadata.json");
    std::fs::write(&metadata, r#"{"pages_count": 3, "chunks_count": 12}"#).unwrap();

    let comparison = compare_files(&paths.baseline, &metadata).unwrap();
    assert_eq!(comparison.expected_pages, 4);
    assert_eq!(comparison.expected_routes, 8);
    assert!((comparison.percentage - 75.0).abs() < 1e-9);
    assert_eq!(comparison.status, CoverageStatus::Incomplete);
}
