//! Statistics over a finished crawl
//!
//! This module derives aggregate numbers from a [`CrawlReport`] and prints
//! them for the command-line interface.

use crate::crawler::CrawlReport;
use crate::extractor::KeywordCounts;
use serde::Serialize;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlSummary {
    /// Number of URLs in the crawl
    pub total: usize,

    /// URLs that produced an extraction result
    pub succeeded: usize,

    /// URLs that failed, including cancelled ones
    pub failed: usize,

    /// Percentage of URLs that succeeded (0.0 for an empty crawl)
    pub success_rate: f64,

    /// Links found across all successful pages
    pub total_links: usize,

    /// Sum of each keyword's count across successful pages
    pub keyword_totals: KeywordCounts,
}

impl CrawlSummary {
    /// Computes the summary of `report`
    pub fn from_report(report: &CrawlReport) -> Self {
        let succeeded = report.successes.len();
        let failed = report.failures.len();
        let total = succeeded + failed;

        let success_rate = if total > 0 {
            (succeeded as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        let mut keyword_totals = KeywordCounts::new();
        for success in &report.successes {
            for (keyword, count) in &success.keyword_counts {
                *keyword_totals.entry(keyword.clone()).or_insert(0) += count;
            }
        }

        Self {
            total,
            succeeded,
            failed,
            success_rate,
            total_links: report.successes.iter().map(|s| s.links.len()).sum(),
            keyword_totals,
        }
    }

    /// One-line human-readable rendering
    pub fn summary_line(&self) -> String {
        format!(
            "Crawled {} URLs: {} succeeded, {} failed ({:.1}% success), {} links found",
            self.total, self.succeeded, self.failed, self.success_rate, self.total_links
        )
    }
}

/// Prints the summary line and per-keyword totals to stderr
///
/// Stdout is left for the JSON report.
pub fn print_summary(summary: &CrawlSummary) {
    eprintln!("{}", summary.summary_line());

    for (keyword, count) in &summary.keyword_totals {
        eprintln!("  {}: {}", keyword, count);
    }
}
