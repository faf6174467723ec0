//! External collaborator ports (persistence, rendering, confirmation).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dnaforge_domain::{
    ContainerKind, ContainerSnapshot, DnaName, InstanceId, InventorySnapshot, PlayerId, SlotRef,
};

use super::error::PersistenceError;

// =============================================================================
// Persistence
// =============================================================================

/// One versioned snapshot of a player's containers, as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushRequest {
    pub player_id: PlayerId,
    /// Per-player, strictly increasing. The backend may drop anything older
    /// than what it already stored.
    pub version: u64,
    pub taken_at: DateTime<Utc>,
    pub snapshot: InventorySnapshot,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PersistencePort: Send + Sync {
    async fn flush(&self, request: &FlushRequest) -> Result<(), PersistenceError>;
}

// =============================================================================
// Rendering
// =============================================================================

/// Redraw callback. Called once per touched container after every committed
/// mutation.
#[cfg_attr(test, mockall::automock)]
pub trait RenderPort: Send + Sync {
    fn render(&self, kind: ContainerKind, snapshot: &ContainerSnapshot);
}

// =============================================================================
// Confirmation
// =============================================================================

/// What the player is asked before a deletion goes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPrompt {
    pub slot: SlotRef,
    pub instance_id: InstanceId,
    pub name: DnaName,
}

impl ConfirmationPrompt {
    pub fn message(&self) -> String {
        format!("Delete {}? This cannot be undone.", self.name)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// `true` when the player accepted.
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool;
}
