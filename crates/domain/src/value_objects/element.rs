//! Elemental affinity of a DNA template

use serde::{Deserialize, Serialize};

/// Element a DNA strand carries into combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Fire,
    Water,
    Earth,
    Wind,
    Light,
    Dark,
    Neutral,
    /// Unknown element for forward compatibility
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fire => write!(f, "fire"),
            Self::Water => write!(f, "water"),
            Self::Earth => write!(f, "earth"),
            Self::Wind => write!(f, "wind"),
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::Neutral => write!(f, "neutral"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for ElementType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fire" => Ok(Self::Fire),
            "water" => Ok(Self::Water),
            "earth" => Ok(Self::Earth),
            "wind" | "air" => Ok(Self::Wind),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "neutral" => Ok(Self::Neutral),
            _ => Ok(Self::Unknown),
        }
    }
}
