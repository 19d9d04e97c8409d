//! Output module for recorded errors and crawl reports
//!
//! This module handles:
//! - The error record type and its log format
//! - Recording errors in memory and appending them to the error log
//! - Printing the end-of-run report

mod error_log;
mod recorder;
pub mod report;
mod traits;

pub use error_log::{ErrorLogFile, DEFAULT_ERROR_LOG};
pub use recorder::ErrorRecorder;
pub use report::{format_errors, format_summary, print_report, CrawlSummary};
pub use traits::{
    ErrorReason, ErrorRecord, ErrorSink, OutputError, OutputResult, CONNECTION_ERROR,
    ENTRY_SEPARATOR,
};
