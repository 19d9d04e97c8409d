//! Error record types and the durable sink trait
//!
//! This module defines what a recorded failure looks like and the trait
//! interface that persists it.

use crate::crawler::TransportFailure;
use std::fmt;
use thiserror::Error;

/// Reason text written for every transport-level failure
pub const CONNECTION_ERROR: &str = "Connection Error";

/// Separator line that closes each entry in the error log
pub const ENTRY_SEPARATOR: &str = "-------------------";

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Why a destination failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    /// The destination itself answered with a 4xx or 5xx status
    HttpStatus(u16),

    /// Loading failed before a status for the destination was known
    ///
    /// The specific failure kind is kept for logs and callers, but the
    /// textual form is always [`CONNECTION_ERROR`].
    Transport(TransportFailure),
}

impl ErrorReason {
    /// Returns the HTTP status code, if this is a status failure
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(code) => Some(*code),
            Self::Transport(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "{}", code),
            Self::Transport(_) => f.write_str(CONNECTION_ERROR),
        }
    }
}

/// A single failed destination together with the page that linked to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Address of the page containing the link
    pub source: String,

    /// The exact address that was attempted
    pub destination: String,

    /// What went wrong
    pub reason: ErrorReason,
}

impl ErrorRecord {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        reason: ErrorReason,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            reason,
        }
    }

    /// Formats the record as a four-line error log entry
    ///
    /// ```
    /// use link_patrol::output::{ErrorReason, ErrorRecord};
    ///
    /// let record = ErrorRecord::new("https://a.com/", "https://a.com/x", ErrorReason::HttpStatus(404));
    /// assert_eq!(
    ///     record.to_log_entry(),
    ///     "Source: https://a.com/\nDestination: https://a.com/x\nError Code: 404\n-------------------\n"
    /// );
    /// ```
    pub fn to_log_entry(&self) -> String {
        format!(
            "Source: {}\nDestination: {}\nError Code: {}\n{}\n",
            self.source, self.destination, self.reason, ENTRY_SEPARATOR
        )
    }
}

/// Trait for durable error sinks
///
/// A sink receives every record in detection order. Failing to persist a
/// record must not abort the crawl; the recorder logs the error and moves on.
pub trait ErrorSink {
    /// Durably appends one record
    fn append(&mut self, record: &ErrorRecord) -> OutputResult<()>;
}
