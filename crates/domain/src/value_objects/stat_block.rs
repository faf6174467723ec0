//! Base stats a DNA template contributes to a combined creature

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatBlock {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl StatBlock {
    pub fn new(hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            hp,
            attack,
            defense,
            speed,
        }
    }

    /// Sum of all four stats, used for sorting and display.
    pub fn total(&self) -> u32 {
        self.hp
            .saturating_add(self.attack)
            .saturating_add(self.defense)
            .saturating_add(self.speed)
    }
}

impl std::ops::Add for StatBlock {
    type Output = StatBlock;

    fn add(self, rhs: StatBlock) -> StatBlock {
        StatBlock {
            hp: self.hp.saturating_add(rhs.hp),
            attack: self.attack.saturating_add(rhs.attack),
            defense: self.defense.saturating_add(rhs.defense),
            speed: self.speed.saturating_add(rhs.speed),
        }
    }
}
