//! In-memory persistence backend.
//!
//! Records every flushed snapshot. Used when no backend URL is configured
//! and by tests that need to inspect what was sent.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use dnaforge_domain::PlayerId;

use crate::infrastructure::ports::{FlushRequest, PersistenceError, PersistencePort};

#[derive(Default)]
pub struct InMemoryPersistence {
    flushed: Mutex<Vec<FlushRequest>>,
    failing: AtomicBool,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every flush fails with `Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn flushed(&self) -> Vec<FlushRequest> {
        self.flushed.lock().await.clone()
    }

    pub async fn flush_count(&self) -> usize {
        self.flushed.lock().await.len()
    }

    /// Most recent snapshot stored for a player.
    pub async fn latest(&self, player_id: PlayerId) -> Option<FlushRequest> {
        self.flushed
            .lock()
            .await
            .iter()
            .rev()
            .find(|request| request.player_id == player_id)
            .cloned()
    }
}

#[async_trait]
impl PersistencePort for InMemoryPersistence {
    async fn flush(&self, request: &FlushRequest) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable);
        }
        self.flushed.lock().await.push(request.clone());
        Ok(())
    }
}
