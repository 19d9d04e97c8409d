//! Console report for a finished crawl
//!
//! This module turns a crawl outcome into the human-readable summary printed
//! at the end of a run.

use crate::crawler::CrawlOutcome;
use crate::output::traits::ErrorRecord;
use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Summary statistics for a crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub seed: String,
    pub origin_host: String,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,

    pub pages_visited: usize,
    pub pages_succeeded: usize,
    pub http_errors: usize,
    pub transport_errors: usize,
}

impl CrawlSummary {
    /// Builds the summary from a finished crawl
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let state = &outcome.state;
        Self {
            seed: outcome.seed.clone(),
            origin_host: state.origin_host.clone(),
            started_at: outcome.started_at,
            elapsed: outcome.elapsed,
            pages_visited: state.visited.len(),
            pages_succeeded: state.count_in_state(PageState::Succeeded),
            http_errors: state.count_in_state(PageState::HttpStatusError),
            transport_errors: state.count_in_state(PageState::TransportError),
        }
    }

    pub fn total_errors(&self) -> usize {
        self.http_errors + self.transport_errors
    }

    /// Pages visited per second over the whole run
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.pages_visited as f64 / secs
    }
}

/// Formats the error section of the report
///
/// Returns the explicit "no errors" message when nothing was recorded,
/// otherwise every record in log format, separated by blank lines.
pub fn format_errors(errors: &[ErrorRecord]) -> String {
    if errors.is_empty() {
        return "No errors found!\n".to_string();
    }

    let entries: Vec<String> = errors.iter().map(ErrorRecord::to_log_entry).collect();
    format!("Errors found:\n{}", entries.join("\n"))
}

/// Formats the summary block printed above the error list
pub fn format_summary(summary: &CrawlSummary) -> String {
    format!(
        "=== Crawl Report ===\n\n\
         Seed: {}\n\
         Host: {}\n\
         Started: {}\n\
         Pages visited: {} in {:.1}s ({:.2} pages/sec)\n\
         Pages loaded successfully: {}\n\
         Errors: {} ({} HTTP status, {} connection)\n",
        summary.seed,
        summary.origin_host,
        summary.started_at.to_rfc3339(),
        summary.pages_visited,
        summary.elapsed.as_secs_f64(),
        summary.rate(),
        summary.pages_succeeded,
        summary.total_errors(),
        summary.http_errors,
        summary.transport_errors
    )
}

/// Prints the summary and the error list to stdout
pub fn print_report(outcome: &CrawlOutcome) {
    let summary = CrawlSummary::from_outcome(outcome);

    println!("{}", format_summary(&summary));
    print!("{}", format_errors(outcome.errors()));
}
