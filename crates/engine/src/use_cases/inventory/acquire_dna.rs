//! Acquire DNA use case.
//!
//! Cuts a new instance from the catalog and places it by overflow
//! resolution: first free inventory slot, else the backpack.

use std::sync::Arc;

use dnaforge_domain::{
    transfer, DnaInstance, OperationKind, PlayerInventoryState, SlotRef, TemplateCatalog,
    TemplateId,
};

use crate::infrastructure::ports::{ClockPort, RenderPort};
use crate::use_cases::sync::{PersistenceSynchronizer, SyncTicket};

use super::error::InventoryError;
use super::render_containers;

#[derive(Debug)]
pub struct AcquireResult {
    pub instance: DnaInstance,
    pub slot: SlotRef,
    pub sync: SyncTicket,
}

pub struct AcquireDna {
    catalog: Arc<TemplateCatalog>,
    clock: Arc<dyn ClockPort>,
    render: Arc<dyn RenderPort>,
    sync: Arc<PersistenceSynchronizer>,
}

impl AcquireDna {
    pub fn new(
        catalog: Arc<TemplateCatalog>,
        clock: Arc<dyn ClockPort>,
        render: Arc<dyn RenderPort>,
        sync: Arc<PersistenceSynchronizer>,
    ) -> Self {
        Self {
            catalog,
            clock,
            render,
            sync,
        }
    }

    pub async fn execute(
        &self,
        state: &mut PlayerInventoryState,
        template_id: &TemplateId,
    ) -> Result<AcquireResult, InventoryError> {
        let instance = self
            .catalog
            .instantiate_by_id(template_id, self.clock.now())?;
        let instance_id = instance.instance_id();
        let acquired = instance.clone();

        let slot = transfer::place_overflow(state, instance).map_err(|e| {
            tracing::warn!(
                player_id = %state.player_id(),
                template_id = %template_id,
                instance_id = %e.instance.instance_id(),
                "Acquired DNA has nowhere to go"
            );
            InventoryError::Unplaceable {
                template_id: template_id.clone(),
                instance_id,
            }
        })?;

        render_containers(self.render.as_ref(), state, &[slot.container]);
        tracing::info!(
            player_id = %state.player_id(),
            template_id = %template_id,
            instance_id = %instance_id,
            slot = %slot,
            "DNA acquired"
        );

        let sync = self
            .sync
            .sync(state.snapshot(), OperationKind::Acquisition)
            .await?;
        Ok(AcquireResult {
            instance: acquired,
            slot,
            sync,
        })
    }
}
