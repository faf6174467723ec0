//! Inventory use cases.
//!
//! Moves, acquisition, combination consumption and backpack pickup. Each one
//! mutates the session's state in place, redraws the containers it touched
//! and syncs according to the operation's policy.

mod acquire_dna;
mod consume_combination;
mod error;
mod move_item;
mod pickup_backpack;

use std::sync::Arc;

use dnaforge_domain::{ContainerKind, PlayerInventoryState};

use crate::infrastructure::ports::RenderPort;

pub use acquire_dna::{AcquireDna, AcquireResult};
pub use consume_combination::{CombinationResult, ConsumeCombination};
pub use error::InventoryError;
pub use move_item::{MoveItem, MoveResult};
pub use pickup_backpack::{PickupBackpack, PickupResult};

/// Container for inventory use cases.
pub struct InventoryUseCases {
    pub move_item: Arc<MoveItem>,
    pub acquire: Arc<AcquireDna>,
    pub consume_combination: Arc<ConsumeCombination>,
    pub pickup_backpack: Arc<PickupBackpack>,
}

impl InventoryUseCases {
    pub fn new(
        move_item: Arc<MoveItem>,
        acquire: Arc<AcquireDna>,
        consume_combination: Arc<ConsumeCombination>,
        pickup_backpack: Arc<PickupBackpack>,
    ) -> Self {
        Self {
            move_item,
            acquire,
            consume_combination,
            pickup_backpack,
        }
    }
}

/// Redraw each listed container once, in the order given.
pub(crate) fn render_containers(
    render: &dyn RenderPort,
    state: &PlayerInventoryState,
    kinds: &[ContainerKind],
) {
    for (i, kind) in kinds.iter().enumerate() {
        if kinds[..i].contains(kind) {
            continue;
        }
        render.render(*kind, &state.container_snapshot(*kind));
    }
}
