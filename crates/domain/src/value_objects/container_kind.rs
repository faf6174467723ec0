//! Container addressing: which container, which slot

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The three containers a player's DNA can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Fixed-length positional grid; the canonical home for DNA.
    Inventory,
    /// Five body-part slots feeding creature synthesis.
    Combination,
    /// Bounded overflow list that tolerates holes.
    TemporaryBackpack,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 3] = [
        ContainerKind::Inventory,
        ContainerKind::Combination,
        ContainerKind::TemporaryBackpack,
    ];

    /// Whether slot count is fixed for the lifetime of the container.
    pub fn is_fixed(&self) -> bool {
        match self {
            Self::Inventory | Self::Combination => true,
            Self::TemporaryBackpack => false,
        }
    }
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inventory => write!(f, "inventory"),
            Self::Combination => write!(f, "combination"),
            Self::TemporaryBackpack => write!(f, "temporary_backpack"),
        }
    }
}

impl std::str::FromStr for ContainerKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "inventory" => Ok(Self::Inventory),
            "combination" => Ok(Self::Combination),
            "temporary_backpack" | "temporaryBackpack" | "backpack" => {
                Ok(Self::TemporaryBackpack)
            }
            _ => Err(DomainError::parse(format!("Unknown container kind: {}", s))),
        }
    }
}

/// A single addressable slot: container plus index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub container: ContainerKind,
    pub index: usize,
}

impl SlotRef {
    pub fn new(container: ContainerKind, index: usize) -> Self {
        Self { container, index }
    }

    pub fn inventory(index: usize) -> Self {
        Self::new(ContainerKind::Inventory, index)
    }

    pub fn combination(index: usize) -> Self {
        Self::new(ContainerKind::Combination, index)
    }

    pub fn backpack(index: usize) -> Self {
        Self::new(ContainerKind::TemporaryBackpack, index)
    }
}

impl std::fmt::Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.container, self.index)
    }
}
