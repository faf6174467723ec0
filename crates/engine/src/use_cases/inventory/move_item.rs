//! Move item use case.
//!
//! Applies one drag-drop or tap-move to the player's containers, redraws
//! what changed and hands the new state to the synchronizer.

use std::sync::Arc;

use dnaforge_domain::{transfer, MoveOutcome, OperationKind, PlayerInventoryState, SlotRef};

use crate::infrastructure::ports::RenderPort;
use crate::use_cases::sync::{PersistenceSynchronizer, SyncTicket};

use super::error::InventoryError;
use super::render_containers;

#[derive(Debug)]
pub struct MoveResult {
    pub outcome: MoveOutcome,
    pub sync: SyncTicket,
}

pub struct MoveItem {
    render: Arc<dyn RenderPort>,
    sync: Arc<PersistenceSynchronizer>,
}

impl MoveItem {
    pub fn new(render: Arc<dyn RenderPort>, sync: Arc<PersistenceSynchronizer>) -> Self {
        Self { render, sync }
    }

    /// Execute the move.
    ///
    /// # Returns
    /// * `Ok(MoveResult)` - State replaced, touched containers rendered
    /// * `Err(InventoryError::Transfer)` - Move rejected, `state` untouched
    pub async fn execute(
        &self,
        state: &mut PlayerInventoryState,
        from: SlotRef,
        to: SlotRef,
    ) -> Result<MoveResult, InventoryError> {
        let (next, outcome) = match transfer::move_item(state, from, to) {
            Ok(result) => result,
            Err(e) => {
                tracing::info!(
                    player_id = %state.player_id(),
                    from = %from,
                    to = %to,
                    reason = %e,
                    "Move rejected"
                );
                return Err(e.into());
            }
        };

        let Some(operation) = OperationKind::for_move(&outcome) else {
            tracing::debug!(slot = %from, "Self-drop, nothing to do");
            return Ok(MoveResult {
                outcome,
                sync: SyncTicket::Skipped,
            });
        };

        *state = next;
        render_containers(self.render.as_ref(), state, &outcome.touched);

        tracing::info!(
            player_id = %state.player_id(),
            instance_id = %outcome.moved,
            from = %from,
            to = %to,
            kind = ?outcome.kind,
            relocated_to = ?outcome.relocated.map(|r| r.to.to_string()),
            "DNA moved"
        );

        let sync = self.sync.sync(state.snapshot(), operation).await?;
        Ok(MoveResult { outcome, sync })
    }
}
