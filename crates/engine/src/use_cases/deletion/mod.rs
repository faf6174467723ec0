//! Destructive action gate.
//!
//! Deletion is two-phase. `request_delete` records what the player pointed at
//! and hands back a token; nothing is removed until that token is confirmed.
//! Confirmation removes the instance and then performs a blocking flush, so
//! the deletion is reported only once the backend has it (or has failed).
//!
//! At most one deletion is pending per session. A new request or a decline
//! discards the previous token.

use std::sync::Arc;

use dnaforge_domain::{
    DeletionToken, DnaInstance, InstanceId, OperationKind, PlayerInventoryState, RemovalError,
    SlotRef,
};

use crate::infrastructure::ports::{ConfirmationPort, ConfirmationPrompt, RenderPort};
use crate::use_cases::inventory::render_containers;
use crate::use_cases::sync::{FlushOutcome, PersistenceSynchronizer, SyncError, SyncTicket};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeletionError {
    #[error("Nothing to delete at {slot}")]
    EmptySlot { slot: SlotRef },
    #[error("{slot} does not exist")]
    OutOfRange { slot: SlotRef },
    #[error("No pending deletion for token {token}")]
    UnknownToken { token: DeletionToken },
    /// The instance moved between request and confirmation.
    #[error("Deletion of {instance_id} at {slot} is stale")]
    StaleDeletion {
        slot: SlotRef,
        instance_id: InstanceId,
    },
    /// Removed locally but the backend did not accept the change.
    #[error("Deleted {instance_id} locally but persistence failed: {source}")]
    PersistenceFailure {
        instance_id: InstanceId,
        #[source]
        source: SyncError,
    },
}

/// A deletion waiting for the player's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub token: DeletionToken,
    pub prompt: ConfirmationPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedDna {
    pub instance: DnaInstance,
    pub slot: SlotRef,
    pub flush: FlushOutcome,
}

pub struct DestructiveActionGate {
    render: Arc<dyn RenderPort>,
    confirmation: Arc<dyn ConfirmationPort>,
    sync: Arc<PersistenceSynchronizer>,
    pending: Option<PendingDeletion>,
}

impl DestructiveActionGate {
    pub fn new(
        render: Arc<dyn RenderPort>,
        confirmation: Arc<dyn ConfirmationPort>,
        sync: Arc<PersistenceSynchronizer>,
    ) -> Self {
        Self {
            render,
            confirmation,
            sync,
            pending: None,
        }
    }

    pub fn pending(&self) -> Option<&PendingDeletion> {
        self.pending.as_ref()
    }

    /// Record a deletion request for the instance at `slot`.
    pub fn request_delete(
        &mut self,
        state: &PlayerInventoryState,
        slot: SlotRef,
    ) -> Result<PendingDeletion, DeletionError> {
        let instance = state
            .container(slot.container)
            .get(slot.index)
            .map_err(|_| DeletionError::OutOfRange { slot })?
            .ok_or(DeletionError::EmptySlot { slot })?;

        let pending = PendingDeletion {
            token: DeletionToken::new(),
            prompt: ConfirmationPrompt {
                slot,
                instance_id: instance.instance_id(),
                name: instance.name().clone(),
            },
        };
        if let Some(previous) = self.pending.replace(pending.clone()) {
            tracing::debug!(token = %previous.token, "Pending deletion replaced");
        }
        tracing::info!(
            player_id = %state.player_id(),
            token = %pending.token,
            slot = %slot,
            instance_id = %pending.prompt.instance_id,
            "Deletion requested"
        );
        Ok(pending)
    }

    /// Drop a pending deletion. Returns whether `token` was the pending one.
    pub fn decline(&mut self, token: DeletionToken) -> bool {
        match &self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                tracing::info!(token = %token, "Deletion declined");
                true
            }
            _ => false,
        }
    }

    /// Apply a confirmed deletion and flush it before returning.
    pub async fn confirm(
        &mut self,
        state: &mut PlayerInventoryState,
        token: DeletionToken,
    ) -> Result<DeletedDna, DeletionError> {
        let pending = match self.pending.take() {
            Some(pending) if pending.token == token => pending,
            other => {
                self.pending = other;
                return Err(DeletionError::UnknownToken { token });
            }
        };
        let slot = pending.prompt.slot;
        let instance_id = pending.prompt.instance_id;

        let instance = state
            .remove_instance(slot, instance_id)
            .map_err(|e| match e {
                RemovalError::OutOfRange(_) => DeletionError::OutOfRange { slot },
                RemovalError::EmptySlot { .. } | RemovalError::InstanceMismatch { .. } => {
                    tracing::warn!(slot = %slot, instance_id = %instance_id, "Stale deletion refused");
                    DeletionError::StaleDeletion { slot, instance_id }
                }
            })?;

        render_containers(self.render.as_ref(), state, &[slot.container]);
        tracing::info!(
            player_id = %state.player_id(),
            instance_id = %instance_id,
            slot = %slot,
            "DNA deleted"
        );

        let flush = match self.sync.sync(state.snapshot(), OperationKind::Deletion).await {
            Ok(SyncTicket::Completed(outcome)) => outcome,
            Ok(ticket) => match ticket.settle().await {
                Some(Ok(outcome)) => outcome,
                Some(Err(source)) => {
                    return Err(DeletionError::PersistenceFailure {
                        instance_id,
                        source,
                    })
                }
                None => FlushOutcome::Superseded { by: 0 },
            },
            Err(source) => {
                return Err(DeletionError::PersistenceFailure {
                    instance_id,
                    source,
                })
            }
        };

        Ok(DeletedDna {
            instance,
            slot,
            flush,
        })
    }

    /// Ask the confirmation collaborator, then confirm or decline.
    ///
    /// Returns `Ok(None)` when the player declined.
    pub async fn delete_with_confirmation(
        &mut self,
        state: &mut PlayerInventoryState,
        slot: SlotRef,
    ) -> Result<Option<DeletedDna>, DeletionError> {
        let pending = self.request_delete(state, slot)?;
        if self.confirmation.confirm(&pending.prompt).await {
            self.confirm(state, pending.token).await.map(Some)
        } else {
            self.decline(pending.token);
            Ok(None)
        }
    }
}
