//! The rendering session
//!
//! A renderer has exactly one session. It is held for the duration of a
//! single load and released when the returned guard is dropped, so clones of
//! a renderer never load two pages at once.

use crate::crawler::renderer::TransportFailure;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// The single rendering session shared by a renderer and its clones
#[derive(Debug, Clone)]
pub struct RenderSession {
    permit: Arc<Semaphore>,
}

/// A checked-out session; dropping it releases the session
#[derive(Debug)]
pub struct SessionGuard {
    _permit: OwnedSemaphorePermit,
}

impl RenderSession {
    pub fn new() -> Self {
        Self {
            permit: Arc::new(Semaphore::new(1)),
        }
    }

    /// Waits until the session is free and takes it
    pub async fn acquire(&self) -> Result<SessionGuard, TransportFailure> {
        let permit = self
            .permit
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| TransportFailure::Other("rendering session closed".to_string()))?;

        Ok(SessionGuard { _permit: permit })
    }

    /// Returns true while a load holds the session
    pub fn is_busy(&self) -> bool {
        self.permit.available_permits() == 0
    }

    /// Returns true if both handles refer to the same session
    pub fn same_session(&self, other: &RenderSession) -> bool {
        Arc::ptr_eq(&self.permit, &other.permit)
    }
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new()
    }
}
