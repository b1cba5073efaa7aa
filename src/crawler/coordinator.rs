//! Crawler coordinator - crawl orchestration logic
//!
//! This module fans a batch of URLs out over the extractor client:
//! - One spawned task per URL
//! - A semaphore bounding how many extractions are in flight
//! - A single join loop that owns the success and failure lists
//! - Cancellation that stops dispatch and drops in-flight fetches
//! - Panic isolation: a panicking extraction fails only its own URL

use crate::cache::InMemoryCache;
use crate::config::Config;
use crate::crawler::{CrawlReport, CrawlService, ErrorCrawlResult};
use crate::extractor::{
    CachedPage, ExtractError, ExtractResult, ExtractorClient, HttpExtractorClient,
};
use crate::{ConfigError, CrawlerError};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span};

/// Error text recorded for URLs that did not finish before cancellation
pub const CANCELLED_MESSAGE: &str = "crawl cancelled before completion";

/// What a single URL task reports back to the join loop
enum TaskOutcome {
    Completed(ExtractResult),
    Failed(ExtractError),
    Panicked(String),
    Cancelled,
}

/// Main crawl orchestrator
///
/// Holds the extractor client and the concurrency cap. The cap is fixed at
/// construction; every call to [`Coordinator::run`] gets its own limiter.
pub struct Coordinator {
    client: Arc<dyn ExtractorClient>,
    concurrency_limit: usize,
    span: Span,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `client` - The extractor used for each URL
    /// * `concurrency_limit` - Maximum extractions in flight; must be >= 1
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlerError)` - The limit was zero
    pub fn new(
        client: Arc<dyn ExtractorClient>,
        concurrency_limit: usize,
    ) -> Result<Self, CrawlerError> {
        if concurrency_limit == 0 {
            return Err(ConfigError::Validation(
                "concurrency limit must be at least 1".to_string(),
            )
            .into());
        }

        Ok(Self {
            client,
            concurrency_limit,
            span: tracing::info_span!("crawler", component = "CrawlService"),
        })
    }

    /// Builds the full production stack from configuration
    ///
    /// HTTP client, in-memory origin cache and extractor client are created
    /// here and owned by the coordinator for its lifetime.
    pub fn from_config(config: &Config) -> Result<Self, CrawlerError> {
        let cache = Arc::new(InMemoryCache::<CachedPage>::new());
        let client = HttpExtractorClient::from_config(config, cache)?;

        Self::new(
            Arc::new(client),
            config.crawler.max_concurrent_extractions as usize,
        )
    }

    /// Replaces the span every event of this coordinator is recorded under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Maximum number of extractions in flight
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Runs a crawl over `urls`
    ///
    /// Every URL ends up in exactly one of the report's lists. The only
    /// errors returned are failures of the task machinery itself.
    pub async fn run(
        &self,
        urls: Vec<String>,
        keywords: Vec<String>,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlerError> {
        self.run_inner(urls, keywords, cancel)
            .instrument(self.span.clone())
            .await
    }

    async fn run_inner(
        &self,
        urls: Vec<String>,
        keywords: Vec<String>,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlerError> {
        let total = urls.len();
        let start_time = Instant::now();

        tracing::info!(
            urls = total,
            keywords = keywords.len(),
            limit = self.concurrency_limit,
            "Starting crawl"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit));
        let keywords: Arc<[String]> = keywords.into();
        let mut tasks = JoinSet::new();

        for url in urls {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            let keywords = Arc::clone(&keywords);
            let cancel = cancel.clone();

            tasks.spawn(
                async move {
                    let outcome =
                        extract_one(client.as_ref(), semaphore, &url, &keywords, &cancel).await;
                    (url, outcome)
                }
                .instrument(self.span.clone()),
            );
        }

        // The join loop is the only writer of the report. Panics are caught
        // inside each task, so a JoinError means the runtime tore it down.
        let mut report = CrawlReport::with_capacity(total);

        while let Some(joined) = tasks.join_next().await {
            let (url, outcome) = joined.map_err(|e| CrawlerError::Worker(e.to_string()))?;

            match outcome {
                TaskOutcome::Completed(result) => {
                    tracing::info!(url = %url, "Successfully extracted data from URL");
                    report.successes.push(result.into());
                }
                TaskOutcome::Failed(error) => {
                    tracing::error!(url = %url, error = %error, "Failed to extract data from URL");
                    report.failures.push(ErrorCrawlResult {
                        url,
                        error: error.to_string(),
                    });
                }
                TaskOutcome::Panicked(message) => {
                    tracing::error!(url = %url, panic = %message, "Extraction panicked");
                    report.failures.push(ErrorCrawlResult {
                        url,
                        error: format!("extraction panicked: {}", message),
                    });
                }
                TaskOutcome::Cancelled => {
                    tracing::warn!(url = %url, "Crawl cancelled before URL completed");
                    report.failures.push(ErrorCrawlResult {
                        url,
                        error: CANCELLED_MESSAGE.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            succeeded = report.successes.len(),
            failed = report.failures.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Crawl completed"
        );

        Ok(report)
    }
}

/// Waits for a slot, then extracts one URL unless cancelled first
async fn extract_one(
    client: &dyn ExtractorClient,
    semaphore: Arc<Semaphore>,
    url: &str,
    keywords: &[String],
    cancel: &CancellationToken,
) -> TaskOutcome {
    let _permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            semaphore.close();
            return TaskOutcome::Cancelled;
        }
        permit = Arc::clone(&semaphore).acquire_owned() => match permit {
            Ok(permit) => permit,
            // The limiter is closed only once the crawl is cancelled.
            Err(_) => return TaskOutcome::Cancelled,
        },
    };

    tracing::info!(url, "Extracting data from URL");

    // A result that is already available wins over a concurrent cancel.
    let extraction = AssertUnwindSafe(client.extract(url, keywords)).catch_unwind();

    tokio::select! {
        biased;
        result = extraction => match result {
            Ok(Ok(result)) => TaskOutcome::Completed(result),
            Ok(Err(error)) => TaskOutcome::Failed(error),
            Err(payload) => TaskOutcome::Panicked(panic_message(payload.as_ref())),
        },
        _ = cancel.cancelled() => TaskOutcome::Cancelled,
    }
}

/// Text of a panic payload, for the `&str` and `String` cases `panic!` produces
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[async_trait]
impl CrawlService for Coordinator {
    async fn crawl(
        &self,
        urls: Vec<String>,
        keywords: Vec<String>,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlerError> {
        self.run(urls, keywords, cancel).await
    }
}
