//! Consume combination use case.
//!
//! Takes all five staged DNA out of the combination slots so they can be
//! fused into a creature. Fails without touching anything when a body part
//! is missing.

use std::sync::Arc;

use dnaforge_domain::{CombinationSet, ContainerKind, OperationKind, PlayerInventoryState};

use crate::infrastructure::ports::RenderPort;
use crate::use_cases::sync::{PersistenceSynchronizer, SyncTicket};

use super::error::InventoryError;
use super::render_containers;

#[derive(Debug)]
pub struct CombinationResult {
    pub consumed: CombinationSet,
    pub sync: SyncTicket,
}

pub struct ConsumeCombination {
    render: Arc<dyn RenderPort>,
    sync: Arc<PersistenceSynchronizer>,
}

impl ConsumeCombination {
    pub fn new(render: Arc<dyn RenderPort>, sync: Arc<PersistenceSynchronizer>) -> Self {
        Self { render, sync }
    }

    pub async fn execute(
        &self,
        state: &mut PlayerInventoryState,
    ) -> Result<CombinationResult, InventoryError> {
        let consumed = state.consume_combination()?;
        render_containers(self.render.as_ref(), state, &[ContainerKind::Combination]);

        tracing::info!(player_id = %state.player_id(), "Combination consumed");

        let sync = self
            .sync
            .sync(state.snapshot(), OperationKind::CombinationConsumed)
            .await?;
        Ok(CombinationResult { consumed, sync })
    }
}
