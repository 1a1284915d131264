//! Human-readable report generation
//!
//! Plain-text renderings of a crawl and of a coverage comparison, meant for
//! a terminal or a `.txt` file next to the JSON reports.

use crate::coverage::{CoverageReport, CoverageStatus};
use crate::output::aggregate::{
    categories_by_count, top_pages_by_content, CrawlSummary, REPORTED_FAILURE_COUNT,
    TOP_PAGE_COUNT,
};
use crate::state::{CrawlResult, FailureCause};

const RULE_WIDTH: usize = 70;

/// Longest title shown in the page ranking
const TITLE_WIDTH: usize = 50;

/// Formats a crawl as a plain-text report
///
/// # Arguments
///
/// * `result` - The finished crawl
/// * `summary` - Headline numbers of the crawl
/// * `generated` - When the report was generated, already formatted
pub fn format_text_report(result: &CrawlResult, summary: &CrawlSummary, generated: &str) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut txt = String::new();

    txt.push_str(&format!("{}\n", heavy));
    txt.push_str("Documentation Scrape Report\n");
    txt.push_str(&format!("{}\n", heavy));
    txt.push_str(&format!("Generated: {}\n", generated));
    txt.push_str(&format!("Base URL: {}\n", summary.base_url));
    if let Some(hash) = &summary.config_hash {
        txt.push_str(&format!("Config Hash: {}\n", hash));
    }
    txt.push('\n');

    txt.push_str("SUMMARY\n");
    txt.push_str(&format!("{}\n", light));
    txt.push_str(&format!("Total Pages Scraped: {}\n", summary.total_pages));
    txt.push_str(&format!("Total URLs Visited: {}\n", summary.total_visited_urls));
    txt.push_str(&format!("Failed URLs: {}\n", summary.failed_urls));
    txt.push_str(&format!("Skipped URLs: {}\n", summary.skipped_urls));
    txt.push_str(&format!(
        "Below Content Threshold: {}\n",
        summary.discarded_low_content
    ));
    txt.push_str(&format!("API Routes Found: {}\n", summary.total_api_routes));
    txt.push_str(&format!("Stopped: {}\n", summary.stop_reason));
    txt.push_str(&format!("Elapsed: {:.1}s\n", summary.elapsed_seconds));
    txt.push('\n');

    txt.push_str("CATEGORIES\n");
    txt.push_str(&format!("{}\n", light));
    for (category, count) in categories_by_count(result) {
        txt.push_str(&format!("  {:30} {:5} pages\n", category, count));
    }
    txt.push('\n');

    txt.push_str(&format!("TOP {} PAGES BY CONTENT\n", TOP_PAGE_COUNT));
    txt.push_str(&format!("{}\n", light));
    for (i, page) in top_pages_by_content(result, TOP_PAGE_COUNT)
        .into_iter()
        .enumerate()
    {
        let title: String = page.title.chars().take(TITLE_WIDTH).collect();
        txt.push_str(&format!(
            "{:2}. {:width$} ({} chars)\n",
            i + 1,
            title,
            group_thousands(page.content_length),
            width = TITLE_WIDTH
        ));
        txt.push_str(&format!("    {}\n", page.url));
    }

    if !result.failures.is_empty() {
        txt.push('\n');
        txt.push_str("FAILED URLS\n");
        txt.push_str(&format!("{}\n", light));
        for failure in result.failures.iter().take(REPORTED_FAILURE_COUNT) {
            match &failure.cause {
                FailureCause::Status { status } => {
                    txt.push_str(&format!("  {}: {}\n", status, failure.url));
                }
                cause => {
                    txt.push_str(&format!("  Error: {}\n", failure.url));
                    txt.push_str(&format!("    {}\n", cause));
                }
            }
        }
    }

    txt.push_str(&heavy);
    txt
}

/// Formats a coverage comparison for the terminal
pub fn format_coverage_report(report: &CoverageReport) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let mut txt = String::new();

    txt.push_str(&format!("{}\n", heavy));
    txt.push_str("COVERAGE COMPARISON\n");
    txt.push_str(&format!("{}\n\n", heavy));

    txt.push_str("Pages:\n");
    txt.push_str(&format!("  Expected (audit): {}\n", report.expected_pages));
    txt.push_str(&format!("  Actual (app):     {}\n", report.observed_pages));
    txt.push_str(&format!("  Coverage:         {:.1}%\n", report.percentage));
    let status = match report.status {
        CoverageStatus::Excellent => "EXCELLENT",
        CoverageStatus::Good => "GOOD (but could be better)",
        CoverageStatus::Incomplete => "INCOMPLETE",
    };
    txt.push_str(&format!("  Status:           {}\n\n", status));

    txt.push_str("Routes:\n");
    txt.push_str(&format!("  Expected (audit): {}\n", report.expected_routes));
    match report.observed_routes {
        Some(routes) => txt.push_str(&format!("  Actual (app):     {}\n\n", routes)),
        None => txt.push_str("  Actual (app):     not tracked in metadata\n\n"),
    }

    txt.push_str("Chunks:\n");
    txt.push_str(&format!(
        "  App created:      {}\n",
        group_thousands(report.chunks)
    ));
    txt.push_str(&format!(
        "  Vectors stored:   {}\n",
        group_thousands(report.vectors)
    ));

    txt.push_str(&heavy);
    txt
}

/// 1234567 -> "1,234,567"
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
