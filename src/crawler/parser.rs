//! HTML parser for extracting page text, title and links
//!
//! This module handles parsing HTML content to extract:
//! - Page title
//! - Visible text of the main-content region
//! - Every hyperlink in the document

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from the first `<title>` tag)
    pub title: Option<String>,

    /// Visible text of the main-content region, one text block per line
    pub main_text: Option<String>,

    /// Name of the matcher that located the main-content region
    pub matched_by: Option<String>,

    /// Raw `href` values of every `<a>` in the document, in document order
    pub links: Vec<String>,
}

/// Locates the main-content region of a page
///
/// Implementations are tried in order by a [`ContentLocator`]; the first one
/// that returns an element wins.
pub trait ContentMatcher: Send + Sync {
    fn name(&self) -> &str;

    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>>;
}

/// Matches the first element selected by a CSS selector
#[derive(Debug)]
pub struct SelectorMatcher {
    name: String,
    selector: Selector,
}

impl SelectorMatcher {
    /// Returns None if `css` is not a valid selector
    pub fn new(css: &str) -> Option<Self> {
        let selector = Selector::parse(css).ok()?;
        Some(Self {
            name: css.to_string(),
            selector,
        })
    }
}

impl ContentMatcher for SelectorMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.selector).next()
    }
}

/// Prioritized list of main-content matchers
pub struct ContentLocator {
    matchers: Vec<Box<dyn ContentMatcher>>,
}

impl ContentLocator {
    pub fn new(matchers: Vec<Box<dyn ContentMatcher>>) -> Self {
        Self { matchers }
    }

    /// Documentation-generator templates in fallback order
    ///
    /// `role=main` → Sphinx `document` → Read the Docs `rst-content` →
    /// `<article>` → `<main>` → `<body>`
    pub fn documentation_templates() -> Self {
        Self::from_selectors(&[
            r#"div[role="main"]"#,
            "div.document",
            "div.rst-content",
            "article",
            "main",
            "body",
        ])
    }

    /// Builds a locator from CSS selectors, dropping any that fail to parse
    pub fn from_selectors(selectors: &[&str]) -> Self {
        let matchers = selectors
            .iter()
            .filter_map(|css| SelectorMatcher::new(css))
            .map(|m| Box::new(m) as Box<dyn ContentMatcher>)
            .collect();
        Self::new(matchers)
    }

    /// Runs the matchers in order and returns the first hit with its name
    pub fn locate<'a>(&'a self, document: &'a Html) -> Option<(&'a str, ElementRef<'a>)> {
        self.matchers
            .iter()
            .find_map(|m| m.locate(document).map(|element| (m.name(), element)))
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Default for ContentLocator {
    fn default() -> Self {
        Self::documentation_templates()
    }
}

impl std::fmt::Debug for ContentLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.matchers.iter().map(|m| m.name()))
            .finish()
    }
}

/// Parses HTML content and extracts title, main text and links
///
/// # Example
///
/// ```
/// use docsweep::crawler::{parse_html, ContentLocator};
///
/// let html = r#"<html><head><title>Users</title></head>
///     <body><div role="main"><h1>Users</h1><p>GET /d2l/api/lp/1.0/users/</p></div>
///     <a href="/res/enroll.html">Enrollments</a></body></html>"#;
/// let parsed = parse_html(html, &ContentLocator::default());
/// assert_eq!(parsed.title.as_deref(), Some("Users"));
/// assert_eq!(parsed.main_text.as_deref(), Some("Users\nGET /d2l/api/lp/1.0/users/"));
/// assert_eq!(parsed.links, vec!["/res/enroll.html".to_string()]);
/// ```
pub fn parse_html(html: &str, locator: &ContentLocator) -> ParsedPage {
    let document = Html::parse_document(html);

    let (matched_by, main_text) = match locator.locate(&document) {
        Some((name, element)) => (Some(name.to_string()), Some(visible_text(element))),
        None => (None, None),
    };

    ParsedPage {
        title: extract_title(&document),
        main_text,
        matched_by,
        links: extract_links(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().map(str::trim).collect::<String>())
        .filter(|s| !s.is_empty())
}

/// Extracts the `href` of every anchor in the document
fn extract_links(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect()
}

/// Joins the trimmed, non-empty visible text nodes under `element` with newlines
fn visible_text(element: ElementRef<'_>) -> String {
    let mut blocks = Vec::new();

    for node in element.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| HIDDEN_ELEMENTS.contains(&el.value().name()));
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            blocks.push(trimmed);
        }
    }

    blocks.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> ParsedPage {
        parse_html(html, &ContentLocator::default())
    }

    #[test]
    fn test_extract_title() {
        let parsed = parse("<html><head><title>  Test Page  </title></head><body></body></html>");
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let parsed = parse("<html><head></head><body></body></html>");
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_role_main_wins_over_body() {
        let parsed = parse(
            r#"<html><body><nav>Navigation</nav>
               <div role="main"><p>Main text</p></div></body></html>"#,
        );
        assert_eq!(parsed.matched_by.as_deref(), Some(r#"div[role="main"]"#));
        assert_eq!(parsed.main_text.as_deref(), Some("Main text"));
    }

    #[test]
    fn test_fallback_order() {
        let parsed = parse(
            r#"<html><body><main>From main</main>
               <article>From article</article></body></html>"#,
        );
        assert_eq!(parsed.matched_by.as_deref(), Some("article"));
        assert_eq!(parsed.main_text.as_deref(), Some("From article"));

        let parsed = parse(
            r#"<html><body><div class="wy-nav rst-content">Read the docs</div>
               <div class="sphinx document">Sphinx</div></body></html>"#,
        );
        assert_eq!(parsed.matched_by.as_deref(), Some("div.document"));
    }

    #[test]
    fn test_body_is_last_resort() {
        let parsed = parse("<html><body><p>Only body</p></body></html>");
        assert_eq!(parsed.matched_by.as_deref(), Some("body"));
        assert_eq!(parsed.main_text.as_deref(), Some("Only body"));
    }

    #[test]
    fn test_no_matcher_hits() {
        let locator = ContentLocator::from_selectors(&["article"]);
        let parsed = parse_html("<html><body><p>text</p></body></html>", &locator);
        assert!(parsed.main_text.is_none());
        assert!(parsed.matched_by.is_none());
    }

    #[test]
    fn test_visible_text_is_block_separated() {
        let parsed = parse(
            r#"<html><body><div role="main">
                 <h1>Users</h1>
                 <p>Retrieve   a <code>user</code>.</p>
               </div></body></html>"#,
        );
        assert_eq!(
            parsed.main_text.as_deref(),
            Some("Users\nRetrieve   a\nuser\n.")
        );
    }

    #[test]
    fn test_scripts_and_styles_are_not_text() {
        let parsed = parse(
            r#"<html><body><div role="main">
                 <script>var x = 1;</script><style>p { color: red }</style>
                 <p>Shown</p></div></body></html>"#,
        );
        assert_eq!(parsed.main_text.as_deref(), Some("Shown"));
    }

    #[test]
    fn test_links_come_from_whole_document() {
        let parsed = parse(
            r##"<html><head><title>T</title></head><body>
                 <nav><a href="/nav.html">Nav</a></nav>
                 <div role="main"><a href="page.html">Page</a><a href="#frag">Frag</a></div>
                 <footer><a href=" mailto:x@example.com ">Mail</a><a>No href</a></footer>
               </body></html>"##,
        );
        assert_eq!(
            parsed.links,
            vec!["/nav.html", "page.html", "#frag", "mailto:x@example.com"]
        );
    }

    #[test]
    fn test_invalid_selectors_are_dropped() {
        let locator = ContentLocator::from_selectors(&["main", "div[[["]);
        assert_eq!(locator.len(), 1);
        assert_eq!(ContentLocator::default().len(), 6);
    }
}
