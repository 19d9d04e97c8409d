//! HTTP renderer implementation
//!
//! This module is the shipped rendering collaborator:
//! - Building one pooled HTTP client for the whole crawl
//! - Following redirects manually so every hop is observed
//! - Reading successful HTML bodies and skipping everything else
//! - Classifying transport failures

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::renderer::{
    LoadedPage, ObservedResponse, Renderer, TransportFailure, WaitCondition,
};
use crate::crawler::session::RenderSession;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::collections::HashSet;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// Redirects are disabled at the client level; [`HttpRenderer`] follows them
/// itself so that each hop shows up as an observed response.
///
/// # Example
///
/// ```
/// use link_patrol::config::{CrawlerConfig, UserAgentConfig};
/// use link_patrol::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default());
/// assert!(client.is_ok());
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.user_agent_string())
        .connect_timeout(crawler.connect_timeout())
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renderer that loads pages over plain HTTP(S)
///
/// Documents are parsed but scripts are not executed. The client and its
/// connection pool live for the whole crawl; each load holds the
/// [`RenderSession`] until it returns. Clones share both.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
    session: RenderSession,
    max_redirects: usize,
}

impl HttpRenderer {
    /// Creates a renderer from the crawler and user agent configuration
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(crawler, user_agent)?;
        Ok(Self::with_client(client, crawler.max_redirects as usize))
    }

    /// Creates a renderer around an existing client
    pub fn with_client(client: Client, max_redirects: usize) -> Self {
        Self {
            client,
            session: RenderSession::new(),
            max_redirects,
        }
    }

    pub fn session(&self) -> &RenderSession {
        &self.session
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    /// Loads a page, following redirects manually
    ///
    /// # Request Flow
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 3xx with Location | Record the hop, follow it |
    /// | Redirect back to a seen URL | Protocol failure (loop) |
    /// | More than `max_redirects` hops | Protocol failure |
    /// | 4xx / 5xx | Record it, skip the body |
    /// | Any other status | Record it, read the body if HTML |
    /// | Timeout / connect / body error | Transport failure |
    async fn load(
        &self,
        address: &Url,
        wait: &WaitCondition,
    ) -> Result<LoadedPage, TransportFailure> {
        let _session = self.session.acquire().await?;

        let mut responses = Vec::new();
        let mut current = address.clone();
        let mut seen = HashSet::from([current.to_string()]);

        loop {
            let response = self
                .client
                .get(current.clone())
                .timeout(wait.timeout)
                .send()
                .await
                .map_err(|e| TransportFailure::from_reqwest(&e))?;

            let status = response.status();
            let observed = ObservedResponse::new(current.as_str(), status.as_u16());
            let failed = observed.is_error();
            responses.push(observed);

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok());

            if let (true, Some(location)) = (status.is_redirection(), location) {
                if responses.len() > self.max_redirects {
                    return Err(TransportFailure::Protocol(format!(
                        "more than {} redirects from {}",
                        self.max_redirects, address
                    )));
                }

                let next = current.join(location).map_err(|e| {
                    TransportFailure::Protocol(format!(
                        "invalid redirect location '{}': {}",
                        location, e
                    ))
                })?;

                if !seen.insert(next.to_string()) {
                    return Err(TransportFailure::Protocol(format!(
                        "redirect loop at {}",
                        next
                    )));
                }

                tracing::debug!("Redirect {} -> {} ({})", current, next, status);
                current = next;
                continue;
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            let is_html = content_type
                .as_deref()
                .map(|ct| ct.contains("text/html") || ct.contains("application/xhtml+xml"))
                .unwrap_or(false);

            // Failed pages and non-HTML documents yield no links; a body read
            // error must not mask a status that was already observed
            let body = if is_html && !failed {
                response
                    .text()
                    .await
                    .map_err(|e| TransportFailure::from_reqwest(&e))?
            } else {
                String::new()
            };

            return Ok(LoadedPage::new(
                address.clone(),
                current,
                responses,
                content_type,
                body,
            ));
        }
    }
}
