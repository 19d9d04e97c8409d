//! Depth-first frontier of discovered candidates
//!
//! The frontier is a LIFO stack. Children are pushed in reverse so they pop
//! in document order, and a child's whole subtree is drained before its next
//! sibling pops. With the Visit Ledger consulted at pop time this reproduces
//! recursive depth-first descent without growing the call stack.

/// Source recorded for the seed address
pub const SEED_SOURCE: &str = "Initial Page";

/// A discovered address paired with the page that referenced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub address: String,
    pub source: String,
}

impl Candidate {
    pub fn new(address: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            source: source.into(),
        }
    }

    /// The crawl's starting point
    pub fn seed(address: impl Into<String>) -> Self {
        Self::new(address, SEED_SOURCE)
    }
}

/// Stack of candidates awaiting evaluation
#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<Candidate>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.stack.push(candidate);
    }

    /// Schedules the links found on `source` so they pop in document order
    pub fn push_children(&mut self, source: &str, links: Vec<String>) {
        self.stack.extend(
            links
                .into_iter()
                .rev()
                .map(|address| Candidate::new(address, source)),
        );
    }

    pub fn pop(&mut self) -> Option<Candidate> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
