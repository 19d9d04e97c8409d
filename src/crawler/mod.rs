//! Crawler module for page loading and traversal
//!
//! This module contains the core crawling logic, including:
//! - The renderer seam and its HTTP implementation
//! - HTML parsing and link extraction
//! - The depth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod renderer;
mod session;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, HttpRenderer};
pub use frontier::{Candidate, Frontier, SEED_SOURCE};
pub use parser::extract_links;
pub use renderer::{LoadedPage, ObservedResponse, Renderer, TransportFailure, WaitCondition};
pub use session::{RenderSession, SessionGuard};

use crate::config::Config;
use crate::PatrolError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP renderer and its session
/// 2. Open the error log
/// 3. Load pages depth-first from `seed`, staying on the seed's host
/// 4. Record every failed destination with the page that linked to it
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Crawl finished; per-page failures are in the outcome
/// * `Err(PatrolError)` - The crawl could not start
pub async fn crawl(config: &Config, seed: &str) -> Result<CrawlOutcome, PatrolError> {
    run_crawl(config, seed).await
}
