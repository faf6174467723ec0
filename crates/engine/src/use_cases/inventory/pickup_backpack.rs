//! Pick up backpack use case.
//!
//! Moves backpack DNA into free inventory slots in backpack order until the
//! inventory is full, then closes the holes left behind.

use std::sync::Arc;

use dnaforge_domain::{
    transfer, ContainerKind, OperationKind, PickupOutcome, PlayerInventoryState,
};

use crate::infrastructure::ports::RenderPort;
use crate::use_cases::sync::{PersistenceSynchronizer, SyncTicket};

use super::error::InventoryError;
use super::render_containers;

#[derive(Debug)]
pub struct PickupResult {
    pub outcome: PickupOutcome,
    pub sync: SyncTicket,
}

pub struct PickupBackpack {
    render: Arc<dyn RenderPort>,
    sync: Arc<PersistenceSynchronizer>,
}

impl PickupBackpack {
    pub fn new(render: Arc<dyn RenderPort>, sync: Arc<PersistenceSynchronizer>) -> Self {
        Self { render, sync }
    }

    pub async fn execute(
        &self,
        state: &mut PlayerInventoryState,
    ) -> Result<PickupResult, InventoryError> {
        let (next, outcome) = transfer::collect_backpack(state);
        if next == *state {
            return Ok(PickupResult {
                outcome,
                sync: SyncTicket::Skipped,
            });
        }

        *state = next;
        render_containers(
            self.render.as_ref(),
            state,
            &[ContainerKind::Inventory, ContainerKind::TemporaryBackpack],
        );
        tracing::info!(
            player_id = %state.player_id(),
            moved = outcome.moved.len(),
            remaining = outcome.remaining,
            "Backpack picked up"
        );

        let sync = self
            .sync
            .sync(state.snapshot(), OperationKind::BackpackPickup)
            .await?;
        Ok(PickupResult { outcome, sync })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_persistence::InMemoryPersistence;
    use crate::infrastructure::ports::MockRenderPort;
    use crate::use_cases::inventory::test_support::{dna, synchronizer};
    use dnaforge_domain::{Container, PlayerId, SlotRef};

    #[tokio::test]
    async fn pickup_stops_when_inventory_fills() {
        let store = Arc::new(InMemoryPersistence::new());
        let mut render = MockRenderPort::new();
        render.expect_render().times(2).return_const(());
        let mut state = PlayerInventoryState::new(PlayerId::new(), 2, 3)
            .with_instance_at(SlotRef::backpack(0), dna("A"))
            .unwrap()
            .with_instance_at(SlotRef::backpack(1), dna("B"))
            .unwrap()
            .with_instance_at(SlotRef::backpack(2), dna("C"))
            .unwrap();
        let last = state.instance_at(SlotRef::backpack(2)).unwrap().instance_id();

        let result = PickupBackpack::new(Arc::new(render), synchronizer(store.clone()))
            .execute(&mut state)
            .await
            .unwrap();

        assert_eq!(result.outcome.moved.len(), 2);
        assert_eq!(result.outcome.remaining, 1);
        assert!(state.inventory().is_full());
        assert_eq!(state.backpack().len(), 1);
        assert_eq!(state.locate(last), Some(SlotRef::backpack(0)));
        assert!(result.sync.settle().await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn empty_backpack_is_a_no_op() {
        let store = Arc::new(InMemoryPersistence::new());
        let mut render = MockRenderPort::new();
        render.expect_render().never();
        let mut state = PlayerInventoryState::new(PlayerId::new(), 2, 3);

        let result = PickupBackpack::new(Arc::new(render), synchronizer(store.clone()))
            .execute(&mut state)
            .await
            .unwrap();

        assert!(result.outcome.moved.is_empty());
        assert!(matches!(result.sync, SyncTicket::Skipped));
        assert_eq!(store.flush_count().await, 0);
    }
}
