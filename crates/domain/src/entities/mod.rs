//! Domain entities - Core business objects with identity

mod container;
mod dna;

pub use container::{
    Backpack, Container, ContainerError, ContainerSnapshot, FixedContainer, Slot,
    COMBINATION_SLOTS,
};
pub use dna::{DnaInstance, DnaTemplate};
