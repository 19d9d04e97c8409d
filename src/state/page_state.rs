/// Page state definitions for tracking crawl progress
///
/// This module defines every state an address can be in during a crawl.
use std::fmt;

/// Represents the current state of an address in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Address has not been marked in the Visit Ledger yet
    Unseen,

    /// Address is marked visited and is being loaded by the renderer
    Loading,

    // ===== Terminal States =====
    /// Page loaded and its links were extracted
    Succeeded,

    /// The destination itself answered with a 4xx or 5xx status
    HttpStatusError,

    /// Loading failed before any status for the destination was observed
    TransportError,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unseen | Self::Loading)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::HttpStatusError | Self::TransportError)
    }

    /// Returns true if `next` is a legal successor of this state
    ///
    /// `Unseen` only moves to `Loading`; `Loading` moves to one of the
    /// terminal states; terminal states never move.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        match self {
            Self::Unseen => next == Self::Loading,
            Self::Loading => next.is_terminal(),
            _ => false,
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Loading => "loading",
            Self::Succeeded => "succeeded",
            Self::HttpStatusError => "http_status_error",
            Self::TransportError => "transport_error",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
