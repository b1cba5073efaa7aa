//! Output module for crawl reports
//!
//! This module handles:
//! - Summary statistics over a finished crawl
//! - Rendering the report as JSON
//! - Writing the JSON report to a file

pub mod stats;

pub use stats::{print_summary, CrawlSummary};

use crate::crawler::{CrawlReport, ErrorCrawlResult, SuccessCrawlResult};
use crate::CrawlerError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// JSON document describing one finished crawl
///
/// `results` and `errors` have the same shape as the HTTP response body.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub summary: CrawlSummary,
    pub results: Vec<SuccessCrawlResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorCrawlResult>,
}

impl JsonReport {
    /// Builds the document for `report`, crawled between the two instants
    pub fn new(report: &CrawlReport, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at,
            duration_ms: (finished_at - started_at).num_milliseconds(),
            summary: CrawlSummary::from_report(report),
            results: report.successes.clone(),
            errors: report.failures.clone(),
        }
    }
}

/// Renders the report as pretty-printed JSON
pub fn render_json_report(report: &JsonReport) -> Result<String, CrawlerError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the report as JSON to `output_path`, replacing any existing file
///
/// # Arguments
///
/// * `report` - The report document
/// * `output_path` - Path where the JSON file should be written
pub fn write_json_report(report: &JsonReport, output_path: &Path) -> Result<(), CrawlerError> {
    let json = render_json_report(report)?;

    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(())
}
