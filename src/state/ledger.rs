use std::collections::HashSet;

/// Record of every normalized address already scheduled in this crawl
///
/// The ledger only grows. [`VisitLedger::try_mark`] checks and inserts in one
/// step, which is what guarantees at-most-once visitation regardless of the
/// order in which the frontier hands out candidates.
#[derive(Debug, Clone, Default)]
pub struct VisitLedger {
    visited: HashSet<String>,
}

impl VisitLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `address` as visited
    ///
    /// Returns `true` only for the first insertion of an address.
    pub fn try_mark(&mut self, address: &str) -> bool {
        if self.visited.contains(address) {
            return false;
        }
        self.visited.insert(address.to_string())
    }

    /// Returns true if `address` has already been marked
    pub fn contains(&self, address: &str) -> bool {
        self.visited.contains(address)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Iterates over marked addresses in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }
}
