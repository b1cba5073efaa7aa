//! HTTP-backed extractor client
//!
//! This module handles one URL end to end:
//! - Building the shared HTTP client with the configured user agent
//! - Serving repeat requests from the origin cache, recounting keywords when
//!   the caller asks for a different set
//! - GET requests to fetch page content
//! - Error classification (transport, status, body)
//! - Running the extraction engine and filling the cache

use crate::cache::Cache;
use crate::config::Config;
use crate::extractor::parser::{extract_page, parse_document};
use crate::extractor::{CachedPage, ExtractError, ExtractResult, ExtractorClient};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, Span};

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy (up to 10 hops).
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent and timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use domain_crawler::config::Config;
/// use domain_crawler::extractor::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_millis(config.crawler.request_timeout))
        .connect_timeout(Duration::from_millis(config.crawler.connect_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Extractor client that fetches pages over HTTP
///
/// Pages are cached by URL and a cached URL is never fetched again. A hit
/// with a different keyword list is recounted over the cached page text.
pub struct HttpExtractorClient {
    http: Client,
    cache: Arc<dyn Cache<CachedPage>>,
    span: Span,
}

impl HttpExtractorClient {
    /// Creates a client around an existing HTTP client and cache
    pub fn new(http: Client, cache: Arc<dyn Cache<CachedPage>>) -> Self {
        Self {
            http,
            cache,
            span: tracing::info_span!("extractor", component = "ExtractorClient"),
        }
    }

    /// Builds the HTTP client from `config` and wraps it
    pub fn from_config(
        config: &Config,
        cache: Arc<dyn Cache<CachedPage>>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?, cache))
    }

    /// Replaces the span every event of this client is recorded under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    async fn extract_inner(
        &self,
        url: &str,
        keywords: &[String],
    ) -> Result<ExtractResult, ExtractError> {
        if let Some(cached) = self.cache.get(url) {
            tracing::info!(url, "Returning cached extraction result");
            return Ok(cached.result_for(keywords));
        }

        let html = self.fetch_html(url).await?;

        // Html is !Send; keep it out of any await.
        let page = {
            let document = parse_document(&html);
            extract_page(&document, url, keywords)
        };
        let result = page.result.clone();

        self.cache.set(url, page);
        tracing::debug!(
            url,
            links = result.links.len(),
            meta_descriptions = result.meta_descriptions.len(),
            "Stored extraction result"
        );

        Ok(result)
    }

    /// Sends the GET request and returns the decoded body
    async fn fetch_html(&self, url: &str) -> Result<String, ExtractError> {
        tracing::info!(url, "Fetching HTML from origin");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractError::Fetch(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ExtractError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ExtractError::Parse(format!("failed to read response body: {}", e)))
    }
}

#[async_trait]
impl ExtractorClient for HttpExtractorClient {
    async fn extract(
        &self,
        url: &str,
        keywords: &[String],
    ) -> Result<ExtractResult, ExtractError> {
        self.extract_inner(url, keywords)
            .instrument(self.span.clone())
            .await
    }
}
