//! Append-only error log file
//!
//! Each record becomes a four-line entry. The file is opened in append mode
//! for every record and never truncated, so repeated runs accumulate.

use crate::output::traits::{ErrorRecord, ErrorSink, OutputResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default file name of the error log
pub const DEFAULT_ERROR_LOG: &str = "error_log.txt";

/// Error sink backed by a text file
#[derive(Debug, Clone)]
pub struct ErrorLogFile {
    path: PathBuf,
}

impl ErrorLogFile {
    /// Creates a sink writing to `path`
    ///
    /// The file is created lazily on the first recorded error.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ErrorSink for ErrorLogFile {
    fn append(&mut self, record: &ErrorRecord) -> OutputResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(record.to_log_entry().as_bytes())?;
        file.flush()?;

        Ok(())
    }
}
