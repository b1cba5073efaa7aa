//! Crawler module for batch extraction
//!
//! This module contains the crawl orchestration logic, including:
//! - Bounded-parallel fan-out of extractions across URLs
//! - Per-URL failure isolation
//! - Collection of successes and failures into one report
//! - Cooperative cancellation

mod coordinator;

pub use coordinator::{Coordinator, CANCELLED_MESSAGE};

use crate::extractor::{ExtractResult, KeywordCounts};
use crate::CrawlerError;
use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// A URL that was fetched and extracted without error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessCrawlResult {
    pub url: String,
    pub title: String,
    pub meta_descriptions: Vec<String>,
    pub links: Vec<String>,
    pub keyword_counts: KeywordCounts,
}

impl From<ExtractResult> for SuccessCrawlResult {
    fn from(result: ExtractResult) -> Self {
        Self {
            url: result.url,
            title: result.title,
            meta_descriptions: result.meta_descriptions,
            links: result.links,
            keyword_counts: result.keyword_counts,
        }
    }
}

/// A URL that failed at any stage, with a human-readable cause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorCrawlResult {
    pub url: String,
    pub error: String,
}

/// Outcome of one crawl: every input URL lands in exactly one list
///
/// Neither list is ordered by input position or completion time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub successes: Vec<SuccessCrawlResult>,
    pub failures: Vec<ErrorCrawlResult>,
}

impl CrawlReport {
    /// Creates an empty report with room for `urls` entries
    pub fn with_capacity(urls: usize) -> Self {
        Self {
            successes: Vec::with_capacity(urls),
            failures: Vec::new(),
        }
    }

    /// Total number of URLs accounted for
    pub fn len(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Returns true if no URL was processed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up the success entry for `url`
    pub fn success_for(&self, url: &str) -> Option<&SuccessCrawlResult> {
        self.successes.iter().find(|s| s.url == url)
    }

    /// Looks up the failure entry for `url`
    pub fn failure_for(&self, url: &str) -> Option<&ErrorCrawlResult> {
        self.failures.iter().find(|f| f.url == url)
    }
}

/// Capability for running a batch crawl
///
/// The HTTP and CLI layers depend on this trait rather than on
/// [`Coordinator`] so they can be exercised with in-memory doubles.
#[async_trait]
pub trait CrawlService: Send + Sync {
    /// Extracts every URL in `urls`, counting `keywords` on each page
    ///
    /// `urls` must already be deduplicated. Firing `cancel` stops dispatching
    /// and drops in-flight fetches; unfinished URLs are reported as failures.
    async fn crawl(
        &self,
        urls: Vec<String>,
        keywords: Vec<String>,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlerError>;
}
