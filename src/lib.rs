//! Domain-Crawler: a bounded-parallel page extractor
//!
//! This crate fetches batches of URLs, extracts structured signals from each
//! page (title, meta descriptions, links, keyword counts) and reports per-URL
//! successes and failures without letting one failing origin affect the rest.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod extractor;
pub mod output;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for Domain-Crawler operations
///
/// Per-URL failures never surface here; they are reported as
/// [`crawler::ErrorCrawlResult`] entries. This type covers failures that
/// abort a whole operation.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Crawl worker failed: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid value for environment variable {name}: {value}")]
    Env { name: String, value: String },
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Domain-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use cache::{Cache, InMemoryCache};
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport, CrawlService, ErrorCrawlResult, SuccessCrawlResult};
pub use extractor::{
    CachedPage, ExtractError, ExtractResult, ExtractorClient, HttpExtractorClient,
};
