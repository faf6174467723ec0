//! DNA Forge domain - items, containers and the rules that move items between them
//!
//! Everything here is synchronous and free of I/O. The engine crate drives
//! these types from pointer input and pushes results to rendering and
//! persistence.

pub mod aggregates;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod gesture;
pub mod ids;
pub mod sync_policy;
pub mod transfer;
pub mod value_objects;

pub use aggregates::{
    CombinationError, CombinationSet, InventorySnapshot, PlayerInventoryState, RemovalError,
};
pub use catalog::TemplateCatalog;
pub use entities::{
    Backpack, Container, ContainerError, ContainerSnapshot, DnaInstance, DnaTemplate,
    FixedContainer, Slot, COMBINATION_SLOTS,
};
pub use error::DomainError;
pub use gesture::{
    GestureClassifier, GestureConfig, GestureEffect, GestureEvent, GestureState, Point, Press,
    DEFAULT_DRAG_THRESHOLD_PX, DEFAULT_LONG_PRESS,
};
pub use ids::{DeletionToken, InstanceId, PlayerId, TemplateId};
pub use sync_policy::{OperationKind, SyncBehavior};
pub use transfer::{
    collect_backpack, move_item, place_overflow, MoveKind, MoveOutcome, PickupOutcome,
    PlacementError, Relocation, TransferError,
};
pub use value_objects::{
    BodyPart, ContainerKind, DnaName, ElementType, Rarity, SlotRef, StatBlock,
};
