use crate::output::ErrorRecorder;
use crate::state::{PageState, VisitLedger};
use crate::PatrolError;
use std::collections::HashMap;

/// The mutable traversal context of one crawl run
///
/// Created once from the seed's host, mutated only by the coordinator, and
/// handed back to the caller when the frontier is exhausted.
pub struct CrawlState {
    /// Hostname every visited address must share; fixed for the run
    pub origin_host: String,

    /// Normalized addresses already scheduled
    pub visited: VisitLedger,

    /// Append-only error list, mirrored to the durable error log
    pub errors: ErrorRecorder,

    /// Per-address progress through the page state machine
    pages: HashMap<String, PageState>,
}

impl CrawlState {
    /// Creates a fresh state bound to `origin_host`
    pub fn new(origin_host: impl Into<String>, errors: ErrorRecorder) -> Self {
        Self {
            origin_host: origin_host.into(),
            visited: VisitLedger::new(),
            errors,
            pages: HashMap::new(),
        }
    }

    /// Returns the current state of `address` (`Unseen` if never touched)
    pub fn page_state(&self, address: &str) -> PageState {
        self.pages
            .get(address)
            .copied()
            .unwrap_or(PageState::Unseen)
    }

    /// Moves `address` to `next`, rejecting illegal transitions
    pub fn transition(&mut self, address: &str, next: PageState) -> Result<(), PatrolError> {
        let current = self.page_state(address);
        if !current.can_transition_to(next) {
            return Err(PatrolError::InvalidTransition {
                from: current,
                to: next,
            });
        }
        self.pages.insert(address.to_string(), next);
        Ok(())
    }

    /// Counts addresses that ended in `state`
    pub fn count_in_state(&self, state: PageState) -> usize {
        self.pages.values().filter(|s| **s == state).count()
    }
}

impl std::fmt::Debug for CrawlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlState")
            .field("origin_host", &self.origin_host)
            .field("visited", &self.visited.len())
            .field("errors", &self.errors.len())
            .finish()
    }
}
