//! Candidate URL extraction from uploaded sources
//!
//! Extraction only produces candidates; callers run them through
//! [`validate_urls`](super::validate_urls) or
//! [`validate_unique_urls`](super::validate_unique_urls) afterwards.

use regex::Regex;
use scraper::{Html, Selector};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur while reading a source for extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// The shape of a source that candidates are extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// One candidate per line
    PlainText,
    /// HTML or XML; candidates come from link attributes
    Markup,
    /// Arbitrary text or binary document scanned for URL-shaped tokens
    Document,
}

impl SourceKind {
    /// Picks a source kind from a file name's extension
    pub fn from_file_name(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            None | Some("txt") | Some("list") => Self::PlainText,
            Some("html") | Some("htm") | Some("xml") => Self::Markup,
            Some(_) => Self::Document,
        }
    }

    /// Whether candidates from this kind of source repeat and need de-duplication
    pub fn deduplicates(&self) -> bool {
        matches!(self, Self::Markup | Self::Document)
    }
}

/// Extracts candidate URL strings from content of the given kind
///
/// # Examples
///
/// ```
/// use index_courier::url::{extract_urls, SourceKind};
///
/// let html = r#"<a href="https://a.com/x">A</a><a href="/relative">B</a>"#;
/// let candidates = extract_urls(html, SourceKind::Markup).unwrap();
/// assert_eq!(candidates, vec!["https://a.com/x", "/relative"]);
/// ```
pub fn extract_urls(content: &str, kind: SourceKind) -> Result<Vec<String>, ExtractError> {
    match kind {
        SourceKind::PlainText => Ok(content.lines().map(str::to_string).collect()),
        SourceKind::Markup => extract_markup_links(content),
        SourceKind::Document => Ok(scan_document(content)),
    }
}

/// Extracts candidates from raw bytes, decoding lossily
pub fn extract_urls_from_bytes(
    bytes: &[u8],
    kind: SourceKind,
) -> Result<Vec<String>, ExtractError> {
    let content = String::from_utf8_lossy(bytes);
    extract_urls(&content, kind)
}

/// Reads a file and extracts candidates, choosing the kind from its name
pub fn extract_urls_from_file(path: &Path) -> Result<(SourceKind, Vec<String>), ExtractError> {
    let bytes = std::fs::read(path)?;
    let kind = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(SourceKind::from_file_name)
        .unwrap_or(SourceKind::PlainText);

    Ok((kind, extract_urls_from_bytes(&bytes, kind)?))
}

/// Collects `a[href]` and canonical link targets in document order
fn extract_markup_links(content: &str) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(content);
    let selector = Selector::parse("a[href], link[rel='canonical'][href]")
        .map_err(|e| ExtractError::Selector(format!("{:?}", e)))?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect())
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"(?i)https?://[^\s<>"]+"#).expect("static pattern"))
}

/// Scans free text for URL-shaped tokens, dropping one trailing punctuation mark
fn scan_document(content: &str) -> Vec<String> {
    url_pattern()
        .find_iter(content)
        .map(|m| strip_trailing_punctuation(m.as_str()).to_string())
        .collect()
}

fn strip_trailing_punctuation(token: &str) -> &str {
    match token.chars().last() {
        Some('.' | ',' | ';' | '!' | '?' | ')') => &token[..token.len() - 1],
        _ => token,
    }
}
