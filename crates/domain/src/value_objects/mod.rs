//! Value objects - Immutable objects defined by their attributes

mod body_part;
mod container_kind;
mod element;
mod names;
mod rarity;
mod stat_block;

pub use body_part::BodyPart;
pub use container_kind::{ContainerKind, SlotRef};
pub use element::ElementType;
pub use names::DnaName;
pub use rarity::Rarity;
pub use stat_block::StatBlock;
