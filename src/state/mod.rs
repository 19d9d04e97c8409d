//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitLedger`: at-most-once record of scheduled addresses
//! - `PageState`: per-address progress (unseen, loading, succeeded, failed)
//! - `CrawlState`: the traversal context that ties them to the error list

mod crawl_state;
mod ledger;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use ledger::VisitLedger;
pub use page_state::PageState;
