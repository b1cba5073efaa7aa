//! Request and response bodies for the HTTP surface

use crate::crawler::{CrawlReport, ErrorCrawlResult, SuccessCrawlResult};
use serde::{Deserialize, Serialize};

/// Body of `POST /crawl`
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlRequest {
    pub urls: Vec<String>,

    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Body of a successful `POST /crawl`
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResponse {
    pub results: Vec<SuccessCrawlResult>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorCrawlResult>,
}

impl From<CrawlReport> for CrawlResponse {
    fn from(report: CrawlReport) -> Self {
        Self {
            results: report.successes,
            errors: report.failures,
        }
    }
}

/// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
