//! HTML parser for extracting text and links
//!
//! This module handles parsing HTML content to extract:
//! - Visible text for indexing
//! - Anchor `href` values, in document order
//! - Page title, for logging

use scraper::{Html, Selector};

/// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Visible text nodes joined by single spaces
    pub text: String,

    /// Raw `href` values of every `<a href>`, in document order
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts text, links and title
///
/// Malformed markup never fails: the HTML5 parser recovers the same way a
/// browser would.
///
/// # Example
///
/// ```
/// use sumi_indexer::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hi</p><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.hrefs, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        hrefs: extract_hrefs(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects every text node outside hidden elements
fn extract_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });

        if !hidden {
            parts.push(text);
        }
    }

    parts.join(" ")
}

/// Extracts raw anchor targets; resolution happens in the crawler
fn extract_hrefs(document: &Html) -> Vec<String> {
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}
