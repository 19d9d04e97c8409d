use crate::output::traits::{ErrorReason, ErrorRecord, ErrorSink};

/// Accumulates error records in memory and mirrors them to a durable sink
///
/// Persistence is best-effort: a sink failure is logged and the record is
/// still kept in memory, so the crawl is never interrupted by the log file.
pub struct ErrorRecorder {
    records: Vec<ErrorRecord>,
    sink: Option<Box<dyn ErrorSink + Send>>,
    sink_failures: usize,
}

impl ErrorRecorder {
    /// Creates a recorder that persists every record to `sink`
    pub fn new(sink: impl ErrorSink + Send + 'static) -> Self {
        Self {
            records: Vec::new(),
            sink: Some(Box::new(sink)),
            sink_failures: 0,
        }
    }

    /// Creates a recorder without durable persistence
    pub fn in_memory() -> Self {
        Self {
            records: Vec::new(),
            sink: None,
            sink_failures: 0,
        }
    }

    /// Appends a record and writes it to the sink
    pub fn record(
        &mut self,
        source: &str,
        destination: &str,
        reason: ErrorReason,
    ) -> &ErrorRecord {
        let record = ErrorRecord::new(source, destination, reason);

        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.append(&record) {
                self.sink_failures += 1;
                tracing::warn!("Failed to persist error for {}: {}", destination, e);
            }
        }

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// All records in detection order
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records the sink failed to persist
    pub fn sink_failures(&self) -> usize {
        self.sink_failures
    }

    pub fn into_records(self) -> Vec<ErrorRecord> {
        self.records
    }
}
