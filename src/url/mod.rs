//! URL handling module for Link-Patrol
//!
//! This module provides origin-scoped admission of candidate addresses and
//! the normalization used to key the Visit Ledger.

mod admission;
mod normalize;

pub use admission::{is_admissible, origin_host_of};
pub use normalize::normalize_url;
