//! Application state and composition.

use std::sync::Arc;

use dnaforge_domain::{PlayerId, PlayerInventoryState, TemplateCatalog};

use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::{ClockPort, ConfirmationPort, PersistencePort, RenderPort};
use crate::use_cases::deletion::DestructiveActionGate;
use crate::use_cases::inventory::{
    AcquireDna, ConsumeCombination, InventoryUseCases, MoveItem, PickupBackpack,
};
use crate::use_cases::session::PlayerSession;
use crate::use_cases::sync::PersistenceSynchronizer;

/// Main application state.
///
/// Shared collaborators are wired once here; each player gets a
/// [`PlayerSession`] that borrows them.
pub struct App {
    pub config: EngineConfig,
    pub catalog: Arc<TemplateCatalog>,
    pub sync: Arc<PersistenceSynchronizer>,
    pub use_cases: Arc<InventoryUseCases>,
    render: Arc<dyn RenderPort>,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        config: EngineConfig,
        catalog: TemplateCatalog,
        persistence: Arc<dyn PersistencePort>,
        render: Arc<dyn RenderPort>,
        confirmation: Arc<dyn ConfirmationPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let sync = Arc::new(PersistenceSynchronizer::new(persistence, clock.clone()));

        let use_cases = Arc::new(InventoryUseCases::new(
            Arc::new(MoveItem::new(render.clone(), sync.clone())),
            Arc::new(AcquireDna::new(
                catalog.clone(),
                clock,
                render.clone(),
                sync.clone(),
            )),
            Arc::new(ConsumeCombination::new(render.clone(), sync.clone())),
            Arc::new(PickupBackpack::new(render.clone(), sync.clone())),
        ));

        Self {
            config,
            catalog,
            sync,
            use_cases,
            render,
            confirmation,
        }
    }

    /// Start a session on empty containers sized from config.
    pub fn open_session(&self, player_id: PlayerId) -> PlayerSession {
        let state = PlayerInventoryState::new(
            player_id,
            self.config.inventory_slots,
            self.config.backpack_capacity,
        );
        tracing::info!(
            player_id = %player_id,
            inventory_slots = self.config.inventory_slots,
            backpack_capacity = self.config.backpack_capacity,
            "Opened session"
        );
        self.resume_session(state)
    }

    /// Start a session on previously loaded state.
    pub fn resume_session(&self, state: PlayerInventoryState) -> PlayerSession {
        let gate = DestructiveActionGate::new(
            self.render.clone(),
            self.confirmation.clone(),
            self.sync.clone(),
        );
        PlayerSession::new(
            state,
            self.config.gesture,
            self.use_cases.clone(),
            gate,
            self.sync.clone(),
        )
    }
}
