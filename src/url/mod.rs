//! URL handling for crawl requests
//!
//! This module validates target URLs before they reach the orchestrator and
//! removes duplicates from a batch. URLs are never rewritten: what the caller
//! sends is what gets fetched and what appears in the report.

use crate::UrlError;
use std::collections::HashSet;
use url::Url;

/// Validates that `url_str` is an absolute HTTP(S) URL with a host
///
/// # Arguments
///
/// * `url_str` - The URL string to check
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - Malformed, non-HTTP(S), or host-less URL
///
/// # Examples
///
/// ```
/// use domain_crawler::url::parse_target_url;
///
/// assert!(parse_target_url("https://example.com/page").is_ok());
/// assert!(parse_target_url("ftp://example.com/").is_err());
/// ```
pub fn parse_target_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingDomain),
    }
}

/// Removes exact duplicates, keeping the first occurrence of each URL
///
/// Comparison is on the raw string, so `http://a.com` and `http://a.com/`
/// are distinct entries.
pub fn remove_duplicates(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
