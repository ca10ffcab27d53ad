use std::collections::HashSet;

/// Returns the trimmed candidate if it is a submittable URL
///
/// A candidate is accepted iff, after trimming surrounding whitespace, it is
/// non-empty and starts with `http://` or `https://`. No further
/// well-formedness checks are made.
pub fn accept_url(candidate: &str) -> Option<&str> {
    let trimmed = candidate.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed)
    } else {
        None
    }
}

/// Filters raw candidates down to submittable URLs, preserving order
///
/// Invalid entries are dropped silently. Duplicates are kept; use
/// [`validate_unique_urls`] for sources that repeat links.
///
/// # Examples
///
/// ```
/// use index_courier::url::validate_urls;
///
/// let urls = validate_urls(["  https://a.com ", "not-a-url", "", "http://b.com/x"]);
/// assert_eq!(urls, vec!["https://a.com", "http://b.com/x"]);
/// ```
pub fn validate_urls<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter_map(|c| accept_url(c.as_ref()).map(str::to_string))
        .collect()
}

/// Like [`validate_urls`], keeping only the first occurrence of each URL
pub fn validate_unique_urls<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    validate_urls(candidates)
        .into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
