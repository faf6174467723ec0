//! Body-part roles of the combination slots

use serde::{Deserialize, Serialize};

/// Role of each combination slot when a creature is synthesized.
///
/// Slot index and role are fixed 1:1: `Head` is slot 0, `Tail` is slot 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Head,
    Torso,
    Arms,
    Legs,
    Tail,
}

impl BodyPart {
    pub const ALL: [BodyPart; 5] = [
        BodyPart::Head,
        BodyPart::Torso,
        BodyPart::Arms,
        BodyPart::Legs,
        BodyPart::Tail,
    ];

    pub fn slot_index(&self) -> usize {
        match self {
            Self::Head => 0,
            Self::Torso => 1,
            Self::Arms => 2,
            Self::Legs => 3,
            Self::Tail => 4,
        }
    }

    pub fn from_slot_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for BodyPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Head => write!(f, "head"),
            Self::Torso => write!(f, "torso"),
            Self::Arms => write!(f, "arms"),
            Self::Legs => write!(f, "legs"),
            Self::Tail => write!(f, "tail"),
        }
    }
}
