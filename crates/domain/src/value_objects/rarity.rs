//! Rarity tiers for DNA templates

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Rarity tier. Variant order is the tier order, so `Ord` compares tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Elite,
    Legendary,
    Mythical,
}

impl Rarity {
    /// All tiers from lowest to highest.
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Elite,
        Rarity::Legendary,
        Rarity::Mythical,
    ];
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::Rare => write!(f, "rare"),
            Self::Elite => write!(f, "elite"),
            Self::Legendary => write!(f, "legendary"),
            Self::Mythical => write!(f, "mythical"),
        }
    }
}

impl std::str::FromStr for Rarity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "elite" => Ok(Self::Elite),
            "legendary" => Ok(Self::Legendary),
            "mythical" => Ok(Self::Mythical),
            _ => Err(DomainError::parse(format!("Unknown rarity: {}", s))),
        }
    }
}
