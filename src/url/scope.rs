use crate::config::Config;
use crate::url::CrawlUrl;
use crate::{UrlError, UrlResult};
use url::Url;

/// Decides which normalized URLs the crawl may fetch
///
/// A URL is in scope when:
/// - its host equals the target host exactly (subdomains are out)
/// - its path does not end in a non-content extension
/// - its path does not contain a non-content path fragment
///
/// The deny-lists are short on purpose. A page wrongly excluded is missing
/// from the baseline, so unknown cases are let through.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    host: String,
    skip_extensions: Vec<String>,
    skip_paths: Vec<String>,
}

impl ScopeFilter {
    pub fn new(
        host: impl Into<String>,
        skip_extensions: Vec<String>,
        skip_paths: Vec<String>,
    ) -> Self {
        Self {
            host: host.into().to_lowercase(),
            skip_extensions: skip_extensions
                .into_iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            skip_paths,
        }
    }

    /// Builds the filter for the configured seed host and deny-lists
    pub fn from_config(config: &Config) -> UrlResult<Self> {
        let base = Url::parse(&config.crawler.base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
        let host = base.host_str().ok_or(UrlError::MissingHost)?;

        Ok(Self::new(
            host,
            config.extraction.skip_extensions.clone(),
            config.extraction.skip_paths.clone(),
        ))
    }

    /// The only host this crawl visits
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if the URL should be crawled
    ///
    /// # Examples
    ///
    /// ```
    /// use docsweep::url::{normalize, ScopeFilter};
    ///
    /// let scope = ScopeFilter::new("docs.example.com", vec![".png".into()], vec!["/_static/".into()]);
    /// assert!(scope.in_scope(&normalize("https://docs.example.com/res/user.html")));
    /// assert!(!scope.in_scope(&normalize("https://docs.example.com/logo.PNG")));
    /// assert!(!scope.in_scope(&normalize("https://docs.example.com/_static/app.css")));
    /// assert!(!scope.in_scope(&normalize("https://api.docs.example.com/")));
    /// ```
    pub fn in_scope(&self, url: &CrawlUrl) -> bool {
        let parsed = match Url::parse(url.as_str()) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }

        match parsed.host_str() {
            Some(host) if host.eq_ignore_ascii_case(&self.host) => {}
            _ => return false,
        }

        let path = parsed.path();
        let lowered = path.to_lowercase();

        if self
            .skip_extensions
            .iter()
            .any(|ext| lowered.ends_with(ext.as_str()))
        {
            return false;
        }

        if self.skip_paths.iter().any(|skip| path.contains(skip.as_str())) {
            return false;
        }

        true
    }
}
