use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// HTTP method of a documented route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Parses a method token in any letter case
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API endpoint documented in page prose
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Route {
    pub method: Method,
    /// Path template, placeholders such as `{orgUnitId}` kept verbatim
    pub path: String,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

/// A successfully processed page that cleared the minimum-content threshold
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub content_length: usize,
    pub word_count: usize,
    pub category: String,
    pub routes_found: usize,
    pub routes: Vec<Route>,
    /// First page that linked here; None for the seed
    pub parent_url: Option<String>,
    pub crawled_at: DateTime<Utc>,
}

/// Why a fetch did not produce a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureCause {
    /// The server answered with a non-2xx status
    Status { status: u16 },
    /// The request exceeded the per-fetch timeout
    Timeout,
    /// Connection, TLS, redirect or body-read failure
    Transport { error: String },
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status } => write!(f, "HTTP {}", status),
            Self::Timeout => f.write_str("Timeout"),
            Self::Transport { error } => write!(f, "Error: {}", error),
        }
    }
}

/// A URL whose fetch failed; never retried within a run
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub url: String,
    #[serde(flatten)]
    pub cause: FailureCause,
    pub parent_url: Option<String>,
}

/// Why a successful fetch was not processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    #[serde(rename = "not HTML")]
    NotHtml,
    #[serde(rename = "no main content found")]
    NoMainContent,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotHtml => f.write_str("not HTML"),
            Self::NoMainContent => f.write_str("no main content found"),
        }
    }
}

/// A URL that answered successfully with something the processor cannot use
#[derive(Debug, Clone, Serialize)]
pub struct SkipRecord {
    pub url: String,
    pub reason: SkipReason,
    pub content_type: Option<String>,
    pub title: Option<String>,
}

/// One documented route together with the page it was found on
#[derive(Debug, Clone, Serialize)]
pub struct RouteRecord {
    pub method: Method,
    pub path: String,
    pub found_on: String,
    pub page_title: String,
}
