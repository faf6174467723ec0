//! Player session.
//!
//! Owns one player's [`PlayerInventoryState`] and gesture classifier, and
//! turns classifier effects into use case calls. The session is the only
//! writer of its state; every method takes `&mut self`.

mod script;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use dnaforge_domain::{
    DeletionToken, GestureClassifier, GestureConfig, GestureEffect, GestureEvent, InstanceId,
    MoveOutcome, PickupOutcome, PlayerInventoryState, SlotRef, TemplateId, TransferError,
};

use crate::infrastructure::long_press_timer::LongPressTimer;
use crate::use_cases::deletion::{
    DeletedDna, DeletionError, DestructiveActionGate, PendingDeletion,
};
use crate::use_cases::inventory::{InventoryError, InventoryUseCases};
use crate::use_cases::sync::{FlushOutcome, PersistenceSynchronizer, SyncError, SyncTicket};

pub use script::ScriptStep;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    Deletion(#[from] DeletionError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("No deletion is waiting for confirmation")]
    NoPendingDeletion,
}

/// Something the UI should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TapSelected { slot: SlotRef },
    TapCleared,
    DragBegan { origin: SlotRef },
    EnteredJiggle,
    ExitedJiggle,
    Moved(MoveOutcome),
    MoveRejected {
        from: SlotRef,
        to: SlotRef,
        error: TransferError,
    },
    DeletionRequested(PendingDeletion),
    DeletionDeclined { token: DeletionToken },
    Deleted(DeletedDna),
    Acquired { instance_id: InstanceId, slot: SlotRef },
    CombinationConsumed { instance_ids: Vec<InstanceId> },
    BackpackPickedUp(PickupOutcome),
}

pub struct PlayerSession {
    state: PlayerInventoryState,
    gestures: GestureClassifier,
    timer: LongPressTimer,
    timer_events: mpsc::UnboundedReceiver<GestureEvent>,
    inventory: Arc<InventoryUseCases>,
    gate: DestructiveActionGate,
    sync: Arc<PersistenceSynchronizer>,
    in_flight: Vec<SyncTicket>,
}

impl PlayerSession {
    pub fn new(
        state: PlayerInventoryState,
        gesture_config: GestureConfig,
        inventory: Arc<InventoryUseCases>,
        gate: DestructiveActionGate,
        sync: Arc<PersistenceSynchronizer>,
    ) -> Self {
        let (tx, timer_events) = mpsc::unbounded_channel();
        Self {
            state,
            gestures: GestureClassifier::new(gesture_config),
            timer: LongPressTimer::new(tx),
            timer_events,
            inventory,
            gate,
            sync,
            in_flight: Vec::new(),
        }
    }

    pub fn state(&self) -> &PlayerInventoryState {
        &self.state
    }

    pub fn gestures(&self) -> &GestureClassifier {
        &self.gestures
    }

    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        self.gate.pending()
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Feed one pointer event through the classifier and act on the result.
    pub async fn handle(&mut self, event: GestureEvent) -> Result<Vec<SessionEvent>, SessionError> {
        let effects = self.gestures.handle(event);
        self.apply(effects).await
    }

    /// Deliver any long-press timers that already fired.
    pub async fn pump_timers(&mut self) -> Result<Vec<SessionEvent>, SessionError> {
        let mut events = Vec::new();
        while let Ok(event) = self.timer_events.try_recv() {
            events.extend(self.handle(event).await?);
        }
        Ok(events)
    }

    /// Let `duration` pass, then deliver timers that fired meanwhile.
    pub async fn wait(&mut self, duration: Duration) -> Result<Vec<SessionEvent>, SessionError> {
        tokio::time::sleep(duration).await;
        self.pump_timers().await
    }

    async fn apply(
        &mut self,
        effects: Vec<GestureEffect>,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let mut events = Vec::new();
        for effect in effects {
            match effect {
                GestureEffect::StartTimer { generation, after } => {
                    self.timer.arm(generation, after)
                }
                GestureEffect::CancelTimer { generation } => self.timer.cancel(generation),
                GestureEffect::DragBegan { origin } => {
                    tracing::debug!(origin = %origin, "Drag began");
                    events.push(SessionEvent::DragBegan { origin });
                }
                GestureEffect::Move { from, to } => events.push(self.move_item(from, to).await?),
                GestureEffect::TapSelected { slot } => {
                    events.push(SessionEvent::TapSelected { slot })
                }
                GestureEffect::TapCleared => events.push(SessionEvent::TapCleared),
                GestureEffect::EnteredJiggle => {
                    tracing::debug!(player_id = %self.state.player_id(), "Entered jiggle mode");
                    events.push(SessionEvent::EnteredJiggle);
                }
                GestureEffect::ExitedJiggle => events.push(SessionEvent::ExitedJiggle),
                GestureEffect::RequestDelete { slot } => {
                    let pending = self.gate.request_delete(&self.state, slot)?;
                    events.push(SessionEvent::DeletionRequested(pending));
                }
            }
        }
        Ok(events)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Move directly, bypassing gesture classification.
    pub async fn move_item(
        &mut self,
        from: SlotRef,
        to: SlotRef,
    ) -> Result<SessionEvent, SessionError> {
        match self
            .inventory
            .move_item
            .execute(&mut self.state, from, to)
            .await
        {
            Ok(result) => {
                self.track(result.sync);
                Ok(SessionEvent::Moved(result.outcome))
            }
            Err(InventoryError::Transfer(error)) => {
                Ok(SessionEvent::MoveRejected { from, to, error })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn acquire(&mut self, template_id: &TemplateId) -> Result<SessionEvent, SessionError> {
        let result = self
            .inventory
            .acquire
            .execute(&mut self.state, template_id)
            .await?;
        self.track(result.sync);
        Ok(SessionEvent::Acquired {
            instance_id: result.instance.instance_id(),
            slot: result.slot,
        })
    }

    pub async fn consume_combination(&mut self) -> Result<SessionEvent, SessionError> {
        let result = self
            .inventory
            .consume_combination
            .execute(&mut self.state)
            .await?;
        self.track(result.sync);
        Ok(SessionEvent::CombinationConsumed {
            instance_ids: result
                .consumed
                .into_parts()
                .iter()
                .map(|dna| dna.instance_id())
                .collect(),
        })
    }

    pub async fn pickup_backpack(&mut self) -> Result<SessionEvent, SessionError> {
        let result = self
            .inventory
            .pickup_backpack
            .execute(&mut self.state)
            .await?;
        self.track(result.sync);
        Ok(SessionEvent::BackpackPickedUp(result.outcome))
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    pub async fn confirm_delete(
        &mut self,
        token: DeletionToken,
    ) -> Result<SessionEvent, SessionError> {
        let deleted = self.gate.confirm(&mut self.state, token).await?;
        Ok(SessionEvent::Deleted(deleted))
    }

    /// Confirm whatever deletion is waiting.
    pub async fn confirm_pending(&mut self) -> Result<SessionEvent, SessionError> {
        let token = self
            .gate
            .pending()
            .map(|pending| pending.token)
            .ok_or(SessionError::NoPendingDeletion)?;
        self.confirm_delete(token).await
    }

    pub fn decline_pending(&mut self) -> Result<SessionEvent, SessionError> {
        let token = self
            .gate
            .pending()
            .map(|pending| pending.token)
            .ok_or(SessionError::NoPendingDeletion)?;
        self.gate.decline(token);
        Ok(SessionEvent::DeletionDeclined { token })
    }

    /// Ask the confirmation collaborator and delete on acceptance.
    pub async fn delete_with_confirmation(
        &mut self,
        slot: SlotRef,
    ) -> Result<Option<SessionEvent>, SessionError> {
        let deleted = self
            .gate
            .delete_with_confirmation(&mut self.state, slot)
            .await?;
        Ok(deleted.map(SessionEvent::Deleted))
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Flush the current state and wait for the backend.
    pub async fn flush_now(&mut self) -> Result<FlushOutcome, SessionError> {
        Ok(self.sync.flush(self.state.snapshot()).await?)
    }

    /// Wait for the background flushes this session still has running.
    pub async fn settle_flushes(&mut self) -> Vec<Result<FlushOutcome, SyncError>> {
        let mut results = Vec::new();
        for ticket in self.in_flight.drain(..) {
            if let Some(result) = ticket.settle().await {
                results.push(result);
            }
        }
        results
    }

    /// Keep background flushes that are still running. Finished ones have
    /// already logged any failure from inside their task.
    fn track(&mut self, ticket: SyncTicket) {
        self.in_flight.retain(|pending| !pending.is_finished());
        if !ticket.is_finished() {
            self.in_flight.push(ticket);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::infrastructure::catalog_loader::starter_catalog;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::config::EngineConfig;
    use crate::infrastructure::memory_persistence::InMemoryPersistence;
    use crate::infrastructure::ports::{MockConfirmationPort, MockRenderPort};
    use crate::use_cases::inventory::test_support::dna;
    use chrono::Utc;
    use dnaforge_domain::{Container, Point, PlayerId};

    struct Harness {
        app: App,
        store: Arc<InMemoryPersistence>,
    }

    fn harness(inventory_slots: usize, backpack_capacity: usize) -> Harness {
        let store = Arc::new(InMemoryPersistence::new());
        let mut render = MockRenderPort::new();
        render.expect_render().return_const(());
        let config = EngineConfig {
            inventory_slots,
            backpack_capacity,
            ..EngineConfig::default()
        };
        let app = App::new(
            config,
            starter_catalog().unwrap(),
            store.clone(),
            Arc::new(render),
            Arc::new(MockConfirmationPort::new()),
            Arc::new(FixedClock(Utc::now())),
        );
        Harness { app, store }
    }

    fn fill(
        mut state: PlayerInventoryState,
        slots: impl IntoIterator<Item = SlotRef>,
    ) -> PlayerInventoryState {
        for slot in slots {
            state = state.with_instance_at(slot, dna("Filler")).unwrap();
        }
        state
    }

    fn down(slot: SlotRef) -> GestureEvent {
        GestureEvent::PointerDown {
            slot,
            occupied: true,
            at: Point::new(0.0, 0.0),
        }
    }

    fn id_at(session: &PlayerSession, slot: SlotRef) -> InstanceId {
        session.state().instance_at(slot).unwrap().instance_id()
    }

    mod scenarios {
        use super::*;

        #[tokio::test]
        async fn a_combination_to_empty_inventory_slot() {
            let h = harness(10, 9);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 10, 9),
                (0..9).map(SlotRef::inventory).chain([SlotRef::combination(2)]),
            );
            let mut session = h.app.resume_session(state);
            let x = id_at(&session, SlotRef::combination(2));

            let event = session
                .move_item(SlotRef::combination(2), SlotRef::inventory(9))
                .await
                .unwrap();

            assert!(matches!(event, SessionEvent::Moved(_)));
            assert_eq!(id_at(&session, SlotRef::inventory(9)), x);
            assert!(session.state().instance_at(SlotRef::combination(2)).is_none());
        }

        #[tokio::test]
        async fn b_displaced_item_overflows_to_backpack() {
            let h = harness(10, 9);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 10, 9),
                (0..10)
                    .map(SlotRef::inventory)
                    .chain([SlotRef::combination(0), SlotRef::backpack(0), SlotRef::backpack(1)]),
            );
            let mut session = h.app.resume_session(state);
            let y = id_at(&session, SlotRef::combination(0));
            let z = id_at(&session, SlotRef::inventory(3));

            session
                .move_item(SlotRef::combination(0), SlotRef::inventory(3))
                .await
                .unwrap();

            assert_eq!(id_at(&session, SlotRef::inventory(3)), y);
            assert_eq!(id_at(&session, SlotRef::backpack(2)), z);
            assert!(session.state().instance_at(SlotRef::combination(0)).is_none());
        }

        #[tokio::test]
        async fn c_no_space_for_displaced_changes_nothing() {
            let h = harness(10, 9);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 10, 9),
                (0..10)
                    .map(SlotRef::inventory)
                    .chain((0..9).map(SlotRef::backpack))
                    .chain([SlotRef::combination(0)]),
            );
            let before = state.clone();
            let mut session = h.app.resume_session(state);

            let event = session
                .move_item(SlotRef::combination(0), SlotRef::inventory(3))
                .await
                .unwrap();

            assert!(matches!(
                event,
                SessionEvent::MoveRejected {
                    error: TransferError::NoSpaceForDisplaced { .. },
                    ..
                }
            ));
            assert_eq!(session.state(), &before);
            assert_eq!(h.store.flush_count().await, 0);
        }

        #[tokio::test]
        async fn d_backpack_cannot_combine_directly() {
            let h = harness(10, 9);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 10, 9),
                [SlotRef::backpack(0), SlotRef::backpack(1)],
            );
            let before = state.clone();
            let mut session = h.app.resume_session(state);

            let event = session
                .move_item(SlotRef::backpack(1), SlotRef::combination(4))
                .await
                .unwrap();

            assert_eq!(
                event,
                SessionEvent::MoveRejected {
                    from: SlotRef::backpack(1),
                    to: SlotRef::combination(4),
                    error: TransferError::BackpackCannotCombineDirectly,
                }
            );
            assert_eq!(session.state(), &before);
        }

        #[tokio::test(start_paused = true)]
        async fn e_deletion_waits_for_confirmation_then_flushes_once() {
            let h = harness(10, 9);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 10, 9),
                [SlotRef::inventory(5)],
            );
            let mut session = h.app.resume_session(state);
            let w = id_at(&session, SlotRef::inventory(5));

            session.handle(down(SlotRef::inventory(5))).await.unwrap();
            let events = session.wait(Duration::from_millis(600)).await.unwrap();
            assert_eq!(events, vec![SessionEvent::EnteredJiggle]);

            let events = session
                .handle(GestureEvent::DeleteAffordance {
                    slot: SlotRef::inventory(5),
                })
                .await
                .unwrap();
            assert!(matches!(events[..], [SessionEvent::DeletionRequested(_)]));
            assert_eq!(id_at(&session, SlotRef::inventory(5)), w);
            assert_eq!(h.store.flush_count().await, 0);

            let event = session.confirm_pending().await.unwrap();

            assert!(matches!(event, SessionEvent::Deleted(_)));
            assert!(session.state().instance_at(SlotRef::inventory(5)).is_none());
            assert_eq!(h.store.flush_count().await, 1);
        }
    }

    mod gestures {
        use super::*;

        #[tokio::test]
        async fn tap_tap_moves_item() {
            let h = harness(4, 2);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 4, 2),
                [SlotRef::inventory(0)],
            );
            let mut session = h.app.resume_session(state);
            let item = id_at(&session, SlotRef::inventory(0));

            session.handle(down(SlotRef::inventory(0))).await.unwrap();
            session
                .handle(GestureEvent::PointerUp {
                    slot: Some(SlotRef::inventory(0)),
                })
                .await
                .unwrap();
            session
                .handle(GestureEvent::PointerDown {
                    slot: SlotRef::combination(1),
                    occupied: false,
                    at: Point::default(),
                })
                .await
                .unwrap();
            let events = session
                .handle(GestureEvent::PointerUp {
                    slot: Some(SlotRef::combination(1)),
                })
                .await
                .unwrap();

            assert!(matches!(events.last(), Some(SessionEvent::Moved(_))));
            assert_eq!(id_at(&session, SlotRef::combination(1)), item);
            let results = session.settle_flushes().await;
            assert_eq!(results.len(), 1);
            assert!(results[0].is_ok());
        }

        #[tokio::test]
        async fn drag_and_drop_moves_item() {
            let h = harness(4, 2);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 4, 2),
                [SlotRef::inventory(2)],
            );
            let mut session = h.app.resume_session(state);
            let item = id_at(&session, SlotRef::inventory(2));

            session.handle(down(SlotRef::inventory(2))).await.unwrap();
            let began = session
                .handle(GestureEvent::PointerMove {
                    at: Point::new(40.0, 0.0),
                })
                .await
                .unwrap();
            let dropped = session
                .handle(GestureEvent::Drop {
                    target: Some(SlotRef::backpack(0)),
                })
                .await
                .unwrap();

            assert_eq!(
                began,
                vec![SessionEvent::DragBegan {
                    origin: SlotRef::inventory(2)
                }]
            );
            assert!(matches!(dropped[..], [SessionEvent::Moved(_)]));
            assert_eq!(id_at(&session, SlotRef::backpack(0)), item);
        }

        #[tokio::test(start_paused = true)]
        async fn quick_release_never_enters_jiggle() {
            let h = harness(4, 2);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 4, 2),
                [SlotRef::inventory(0)],
            );
            let mut session = h.app.resume_session(state);

            session.handle(down(SlotRef::inventory(0))).await.unwrap();
            session
                .handle(GestureEvent::PointerUp { slot: None })
                .await
                .unwrap();
            let events = session.wait(Duration::from_secs(1)).await.unwrap();

            assert!(events.is_empty());
            assert!(!session.gestures().is_jiggling());
        }

        #[tokio::test]
        async fn delete_request_on_empty_slot_is_an_error() {
            let h = harness(4, 2);
            let mut session = h.app.open_session(PlayerId::new());

            let result = session
                .apply(vec![GestureEffect::RequestDelete {
                    slot: SlotRef::inventory(1),
                }])
                .await;

            assert!(matches!(
                result,
                Err(SessionError::Deletion(DeletionError::EmptySlot { .. }))
            ));
        }
    }

    mod operations {
        use super::*;

        #[tokio::test]
        async fn acquire_then_pickup() {
            let h = harness(1, 3);
            let mut session = h.app.open_session(PlayerId::new());
            let fire = TemplateId::new("dna_fire_01").unwrap();

            session.acquire(&fire).await.unwrap();
            let overflow = session.acquire(&fire).await.unwrap();
            assert!(matches!(
                overflow,
                SessionEvent::Acquired { slot, .. } if slot == SlotRef::backpack(0)
            ));

            session
                .move_item(SlotRef::inventory(0), SlotRef::combination(0))
                .await
                .unwrap();
            let picked = session.pickup_backpack().await.unwrap();

            assert!(matches!(
                picked,
                SessionEvent::BackpackPickedUp(PickupOutcome { remaining: 0, .. })
            ));
            assert!(session.state().backpack().is_empty());
        }

        #[tokio::test]
        async fn decline_pending_keeps_item() {
            let h = harness(4, 2);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 4, 2),
                [SlotRef::inventory(0)],
            );
            let mut session = h.app.resume_session(state);
            session
                .apply(vec![GestureEffect::RequestDelete {
                    slot: SlotRef::inventory(0),
                }])
                .await
                .unwrap();

            let event = session.decline_pending().unwrap();

            assert!(matches!(event, SessionEvent::DeletionDeclined { .. }));
            assert!(session.pending_deletion().is_none());
            assert_eq!(session.state().total_instances(), 1);
            assert!(matches!(
                session.confirm_pending().await,
                Err(SessionError::NoPendingDeletion)
            ));
        }

        #[tokio::test]
        async fn finished_background_flushes_are_not_retained() {
            let h = harness(4, 2);
            let state = fill(
                PlayerInventoryState::new(PlayerId::new(), 4, 2),
                [SlotRef::inventory(0), SlotRef::inventory(1)],
            );
            let mut session = h.app.resume_session(state);

            for _ in 0..200 {
                session
                    .move_item(SlotRef::inventory(0), SlotRef::inventory(1))
                    .await
                    .unwrap();
                for _ in 0..5 {
                    tokio::task::yield_now().await;
                }
            }

            assert!(session.in_flight.len() <= 2);
            for result in session.settle_flushes().await {
                assert!(result.is_ok());
            }
            assert!(session.in_flight.is_empty());
            assert_eq!(h.app.sync.flushed_version(session.state().player_id()).await, 200);
        }

        #[tokio::test]
        async fn flush_now_reaches_backend() {
            let h = harness(4, 2);
            let mut session = h.app.open_session(PlayerId::new());

            let outcome = session.flush_now().await.unwrap();

            assert_eq!(outcome, FlushOutcome::Flushed { version: 1 });
            assert_eq!(
                h.store.latest(session.state().player_id()).await.unwrap().snapshot,
                session.state().snapshot()
            );
        }
    }
}
