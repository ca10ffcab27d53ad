//! URL handling module for Index-Courier
//!
//! This module provides candidate validation, candidate extraction from
//! uploaded sources, and host extraction for protocol submissions.

mod extract;
mod validate;

pub use extract::{
    extract_urls, extract_urls_from_bytes, extract_urls_from_file, ExtractError, SourceKind,
};
pub use validate::{accept_url, validate_unique_urls, validate_urls};

use url::Url;

/// Extracts the lowercase host from a URL string
///
/// # Examples
///
/// ```
/// use index_courier::url::extract_host;
///
/// assert_eq!(extract_host("https://Example.COM:8080/path"), Some("example.com".to_string()));
/// assert_eq!(extract_host("not a url"), None);
/// ```
pub fn extract_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}
