//! Extractor module: fetch one URL and turn it into structured data
//!
//! This module contains:
//! - The extraction engine (title, meta descriptions, links, keyword counts)
//! - The HTTP-backed client that fronts it with the origin cache
//! - The [`ExtractorClient`] capability the crawl orchestrator depends on

mod client;
mod parser;

pub use client::{build_http_client, HttpExtractorClient};
pub use parser::{count_keywords, count_occurrences, extract, extract_page, parse_document};

use async_trait::async_trait;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Keyword to number of non-overlapping occurrences
pub type KeywordCounts = BTreeMap<String, usize>;

/// Structured data extracted from one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractResult {
    /// The URL as requested (not the post-redirect URL)
    pub url: String,

    /// Text of the first `<title>`, empty if absent
    pub title: String,

    /// `content` of every `meta[name=description]`, in document order
    pub meta_descriptions: Vec<String>,

    /// `href` of every anchor, in document order
    pub links: Vec<String>,

    /// One entry per requested keyword
    pub keyword_counts: KeywordCounts,
}

/// What the origin cache stores for one URL
///
/// Keeping the document text next to the result lets a later request with a
/// different keyword list be answered without refetching or reparsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage {
    pub result: ExtractResult,

    /// Concatenated text nodes of the document
    pub text: String,
}

impl CachedPage {
    /// The cached result with keyword counts for exactly `keywords`
    pub fn result_for(&self, keywords: &[String]) -> ExtractResult {
        let requested: BTreeSet<&str> = keywords.iter().map(String::as_str).collect();
        let cached: BTreeSet<&str> = self
            .result
            .keyword_counts
            .keys()
            .map(String::as_str)
            .collect();

        let mut result = self.result.clone();
        if requested != cached {
            result.keyword_counts = count_keywords(&self.text, keywords);
        }
        result
    }
}

/// Errors that can occur while extracting a single URL
///
/// Messages are carried as strings so the error is cheap to clone and can be
/// produced by test doubles without a live transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The origin could not be reached (DNS, connection, timeout)
    #[error("failed to fetch url: {0}")]
    Fetch(String),

    /// The origin answered with something other than 200
    #[error("unexpected status code: {code} {reason}")]
    Status { code: u16, reason: String },

    /// The body could not be read or decoded as HTML text
    #[error("failed to parse html: {0}")]
    Parse(String),
}

impl ExtractError {
    /// Numeric HTTP status for [`ExtractError::Status`]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Capability for extracting one URL
///
/// The orchestrator only sees this trait, so tests can substitute in-memory
/// doubles for the network-backed [`HttpExtractorClient`].
#[async_trait]
pub trait ExtractorClient: Send + Sync {
    /// Fetches `url` and extracts structured data, counting `keywords`
    async fn extract(&self, url: &str, keywords: &[String])
        -> Result<ExtractResult, ExtractError>;
}
