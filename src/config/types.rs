use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Docsweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl Config {
    /// Builds a configuration with defaults for everything except the seed URL
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig {
                base_url: base_url.into(),
                max_pages: None,
                crawl_delay_ms: default_crawl_delay_ms(),
                timeout_secs: default_timeout_secs(),
                min_content_length: default_min_content_length(),
            },
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL; its host is the only host the crawl may visit
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Stop once this many pages have been recorded (unlimited when absent)
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,

    /// Pause after every processed URL (milliseconds)
    #[serde(rename = "crawl-delay-ms", default = "default_crawl_delay_ms")]
    pub crawl_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pages whose extracted text is not longer than this are visited but not recorded
    #[serde(rename = "min-content-length", default = "default_min_content_length")]
    pub min_content_length: usize,
}

impl CrawlerConfig {
    pub fn crawl_delay(&self) -> Duration {
        Duration::from_millis(self.crawl_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value as `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives every report file
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Metadata file written by the scraper under audit
    #[serde(rename = "app-metadata", default = "default_app_metadata")]
    pub app_metadata: PathBuf,
}

impl OutputConfig {
    /// Location of the coverage baseline inside the output directory
    pub fn baseline_path(&self) -> PathBuf {
        self.directory.join(crate::coverage::BASELINE_FILE_NAME)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            app_metadata: default_app_metadata(),
        }
    }
}

/// Scope and extraction rules
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Path prefix every documented API route starts with
    #[serde(rename = "route-prefix", default = "default_route_prefix")]
    pub route_prefix: String,

    /// Path suffixes that never hold documentation content
    #[serde(rename = "skip-extensions", default = "default_skip_extensions")]
    pub skip_extensions: Vec<String>,

    /// Path fragments of asset directories and generated pages
    #[serde(rename = "skip-paths", default = "default_skip_paths")]
    pub skip_paths: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
            skip_extensions: default_skip_extensions(),
            skip_paths: default_skip_paths(),
        }
    }
}

fn default_crawl_delay_ms() -> u64 {
    200
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_min_content_length() -> usize {
    100
}

fn default_crawler_name() -> String {
    "D2L-API-Auditor".to_string()
}

fn default_crawler_version() -> String {
    "1.0".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("scrape_audit")
}

fn default_app_metadata() -> PathBuf {
    PathBuf::from("scrape_metadata.json")
}

fn default_route_prefix() -> String {
    "/d2l/api/".to_string()
}

fn default_skip_extensions() -> Vec<String> {
    [
        ".png", ".jpg", ".gif", ".css", ".js", ".zip", ".pdf", ".txt", ".svg", ".ico",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_skip_paths() -> Vec<String> {
    ["/_static/", "/_sources/", "/genindex.html", "/search.html"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
