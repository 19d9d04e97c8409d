//! The rendering collaborator seam
//!
//! The coordinator never fetches anything itself. It asks a [`Renderer`] to
//! load an address, inspects the responses the renderer observed while doing
//! so, and asks it for the page's links.

use crate::crawler::parser::extract_links;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Transport-level failure raised before a page finished loading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("timed out waiting for the page to load")]
    Timeout,

    /// Name resolution failure, refused or reset connection, TLS handshake
    #[error("connection failed: {0}")]
    Connect(String),

    /// Malformed response, redirect loop or redirect chain too long
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

impl TransportFailure {
    /// Classifies a `reqwest` error
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else if error.is_redirect() {
            Self::Protocol(error.to_string())
        } else if error.is_body() || error.is_decode() {
            Self::Body(error.to_string())
        } else {
            Self::Other(error.to_string())
        }
    }
}

/// One network response seen while loading a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedResponse {
    /// URL the response was for
    pub url: String,

    /// HTTP status code
    pub status: u16,
}

impl ObservedResponse {
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
        }
    }

    /// Returns true for 4xx and 5xx statuses
    pub fn is_error(&self) -> bool {
        (400..600).contains(&self.status)
    }
}

/// When a page is considered loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitCondition {
    /// Upper bound for the whole load, network settling included
    pub timeout: Duration,
}

impl WaitCondition {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for WaitCondition {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

/// A page handle produced by a successful load
#[derive(Debug, Clone)]
pub struct LoadedPage {
    requested: Url,
    final_url: Url,
    responses: Vec<ObservedResponse>,
    content_type: Option<String>,
    body: String,
}

impl LoadedPage {
    pub fn new(
        requested: Url,
        final_url: Url,
        responses: Vec<ObservedResponse>,
        content_type: Option<String>,
        body: String,
    ) -> Self {
        Self {
            requested,
            final_url,
            responses,
            content_type,
            body,
        }
    }

    /// Builds a page answered directly by one HTML response
    ///
    /// For renderers that serve documents without redirects or
    /// sub-resources, such as in-memory site maps or snapshot replays.
    pub fn html(url: Url, status: u16, body: impl Into<String>) -> Self {
        let responses = vec![ObservedResponse::new(url.as_str(), status)];
        Self::new(
            url.clone(),
            url,
            responses,
            Some("text/html".to_string()),
            body.into(),
        )
    }

    /// The address the load was requested for
    pub fn requested(&self) -> &Url {
        &self.requested
    }

    /// The address of the document finally displayed (after redirects)
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    /// Every response observed during the load, in arrival order
    pub fn responses(&self) -> &[ObservedResponse] {
        &self.responses
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("text/html") || ct.contains("application/xhtml+xml"))
            .unwrap_or(false)
    }

    /// Returns the first 4xx/5xx status observed for the requested address
    ///
    /// Only responses whose URL equals the requested address exactly are
    /// considered; sub-resources and redirect targets never count.
    pub fn destination_error(&self) -> Option<u16> {
        self.responses
            .iter()
            .filter(|response| response.url == self.requested.as_str())
            .find(|response| response.is_error())
            .map(|response| response.status)
    }
}

/// Fetches pages and exposes their hyperlinks
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Loads `address`, waiting until `wait` considers the page loaded
    ///
    /// Returns a transport failure when navigation fails. HTTP error
    /// statuses are not failures here; they are visible through
    /// [`LoadedPage::responses`].
    async fn load(
        &self,
        address: &Url,
        wait: &WaitCondition,
    ) -> Result<LoadedPage, TransportFailure>;

    /// Returns absolute HTTP(S) hyperlink targets in document order
    fn extract_links(&self, page: &LoadedPage) -> Vec<String> {
        if !page.is_html() {
            return Vec::new();
        }
        extract_links(page.body(), page.final_url())
    }
}
