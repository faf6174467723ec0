//! Which mutations reach the persistence backend, and how urgently

use serde::{Deserialize, Serialize};

use crate::transfer::{MoveKind, MoveOutcome};

/// A locally committed mutation, classified for synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Deletion,
    CrossContainerMove,
    Reorder,
    /// Hover and intermediate drag positions.
    DragHover,
    Acquisition,
    CombinationConsumed,
    BackpackPickup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncBehavior {
    /// Flush now and wait for the backend before reporting success.
    Blocking,
    /// Flush now in the background; local interaction continues.
    Immediate,
    None,
}

impl SyncBehavior {
    pub fn requires_flush(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl OperationKind {
    pub fn sync_behavior(&self) -> SyncBehavior {
        match self {
            Self::Deletion => SyncBehavior::Blocking,
            Self::CrossContainerMove
            | Self::Reorder
            | Self::Acquisition
            | Self::CombinationConsumed
            | Self::BackpackPickup => SyncBehavior::Immediate,
            Self::DragHover => SyncBehavior::None,
        }
    }

    /// Classify a move. No-op moves change nothing and map to `None`.
    pub fn for_move(outcome: &MoveOutcome) -> Option<Self> {
        match outcome.kind {
            MoveKind::NoOp => None,
            MoveKind::Reorder => Some(Self::Reorder),
            MoveKind::Transfer => Some(Self::CrossContainerMove),
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Deletion => "deletion",
            Self::CrossContainerMove => "cross_container_move",
            Self::Reorder => "reorder",
            Self::DragHover => "drag_hover",
            Self::Acquisition => "acquisition",
            Self::CombinationConsumed => "combination_consumed",
            Self::BackpackPickup => "backpack_pickup",
        };
        write!(f, "{name}")
    }
}
