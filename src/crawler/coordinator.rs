//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the traversal loop that ties together:
//! - Admission of candidates to the seed's origin
//! - At-most-once visitation through the Visit Ledger
//! - Loading pages through the renderer and classifying the outcome
//! - Attributing failures to the page that linked to them

use crate::config::Config;
use crate::crawler::fetcher::HttpRenderer;
use crate::crawler::frontier::{Candidate, Frontier};
use crate::crawler::renderer::{Renderer, WaitCondition};
use crate::output::{ErrorLogFile, ErrorReason, ErrorRecord, ErrorRecorder};
use crate::state::{CrawlState, PageState};
use crate::url::{is_admissible, normalize_url, origin_host_of};
use crate::PatrolError;
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use url::Url;

/// Everything a finished crawl hands back to its caller
#[derive(Debug)]
pub struct CrawlOutcome {
    /// The seed address, normalized
    pub seed: String,

    /// Final traversal state: visited set, page states and errors
    pub state: CrawlState,

    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl CrawlOutcome {
    /// Recorded errors in detection order
    pub fn errors(&self) -> &[ErrorRecord] {
        self.state.errors.records()
    }

    /// Returns true if `address` was loaded during the crawl
    pub fn was_visited(&self, address: &str) -> bool {
        self.state.visited.contains(address)
    }
}

/// Main crawler coordinator structure
///
/// A coordinator runs exactly one crawl: [`Coordinator::crawl`] consumes it.
pub struct Coordinator<R> {
    renderer: R,
    wait: WaitCondition,
    errors: ErrorRecorder,
}

impl<R: Renderer> Coordinator<R> {
    /// Creates a coordinator that loads pages with `renderer`
    ///
    /// # Arguments
    ///
    /// * `renderer` - The rendering collaborator
    /// * `wait` - When a page counts as loaded
    /// * `errors` - Where failures are recorded
    pub fn new(renderer: R, wait: WaitCondition, errors: ErrorRecorder) -> Self {
        Self {
            renderer,
            wait,
            errors,
        }
    }

    /// Crawls every same-origin page reachable from `seed`
    ///
    /// Per-page failures become error records and never stop the crawl. An
    /// unusable seed is the only error returned.
    pub async fn crawl(self, seed: &str) -> Result<CrawlOutcome, PatrolError> {
        let seed_url = normalize_url(seed)?;
        let origin_host = origin_host_of(seed_url.as_str())?;

        let started_at = Utc::now();
        let start_time = Instant::now();

        tracing::info!("Starting crawl of {} (host {})", seed_url, origin_host);

        let Self {
            renderer,
            wait,
            errors,
        } = self;

        let mut state = CrawlState::new(origin_host, errors);
        let mut frontier = Frontier::new();
        frontier.push(Candidate::seed(seed_url.as_str()));

        while let Some(candidate) = frontier.pop() {
            let Some(address) = admit(&state, &candidate) else {
                continue;
            };

            if !state.visited.try_mark(address.as_str()) {
                continue;
            }

            let links = visit(&renderer, &wait, &mut state, &candidate.source, &address).await?;
            frontier.push_children(address.as_str(), links);

            if state.visited.len() % 25 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} candidates pending, {} errors",
                    state.visited.len(),
                    frontier.len(),
                    state.errors.len()
                );
            }
        }

        tracing::info!(
            "Crawl completed: {} pages visited, {} errors in {:?}",
            state.visited.len(),
            state.errors.len(),
            start_time.elapsed()
        );

        Ok(CrawlOutcome {
            seed: seed_url.to_string(),
            state,
            started_at,
            elapsed: start_time.elapsed(),
        })
    }
}

/// Normalizes a candidate and checks it against the origin
///
/// Returns `None` for malformed and off-origin addresses. Neither is an
/// error; the candidate is simply dropped.
fn admit(state: &CrawlState, candidate: &Candidate) -> Option<Url> {
    let address = match normalize_url(&candidate.address) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Skipping {}: {}", candidate.address, e);
            return None;
        }
    };

    if !is_admissible(address.as_str(), &state.origin_host) {
        tracing::debug!("Skipping off-origin link {}", address);
        return None;
    }

    Some(address)
}

/// Loads one address and classifies the outcome
///
/// Returns the links to follow; failed loads yield none.
async fn visit<R: Renderer>(
    renderer: &R,
    wait: &WaitCondition,
    state: &mut CrawlState,
    source: &str,
    address: &Url,
) -> Result<Vec<String>, PatrolError> {
    let destination = address.as_str();
    state.transition(destination, PageState::Loading)?;

    tracing::info!("Crawling: {}", destination);

    let page = match renderer.load(address, wait).await {
        Ok(page) => page,
        Err(failure) => {
            tracing::warn!("Error crawling {}: {}", destination, failure);
            state
                .errors
                .record(source, destination, ErrorReason::Transport(failure));
            state.transition(destination, PageState::TransportError)?;
            return Ok(Vec::new());
        }
    };

    if let Some(status) = page.destination_error() {
        tracing::warn!("HTTP {} for {} (linked from {})", status, destination, source);
        state
            .errors
            .record(source, destination, ErrorReason::HttpStatus(status));
        state.transition(destination, PageState::HttpStatusError)?;
        return Ok(Vec::new());
    }

    let links = renderer.extract_links(&page);
    tracing::debug!("Found {} links on {}", links.len(), destination);

    state.transition(destination, PageState::Succeeded)?;
    Ok(links)
}

/// Runs a complete crawl with the HTTP renderer and the error log file
///
/// This is the entry point used by the binary:
///
/// 1. Build the HTTP renderer from the configuration
/// 2. Open the error log named in the configuration
/// 3. Crawl from `seed` until the frontier is exhausted
///
/// # Example
///
/// ```no_run
/// use link_patrol::config::Config;
/// use link_patrol::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(&Config::default(), "https://example.com/").await?;
/// println!("{} errors", outcome.errors().len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, seed: &str) -> Result<CrawlOutcome, PatrolError> {
    let renderer = HttpRenderer::new(&config.crawler, &config.user_agent)?;
    let wait = WaitCondition::new(config.crawler.page_timeout());
    let errors = ErrorRecorder::new(ErrorLogFile::new(&config.output.error_log_path));

    Coordinator::new(renderer, wait, errors).crawl(seed).await
}
