//! Use cases - player operations orchestrated over the domain.
//!
//! Each module contains use cases for one area. The session module ties
//! them together per player.

pub mod deletion;
pub mod inventory;
pub mod session;
pub mod sync;

pub use deletion::{DeletedDna, DeletionError, DestructiveActionGate, PendingDeletion};
pub use inventory::{InventoryError, InventoryUseCases};
pub use session::{PlayerSession, ScriptStep, SessionError, SessionEvent};
pub use sync::{FlushOutcome, PersistenceSynchronizer, SyncError, SyncTicket};
