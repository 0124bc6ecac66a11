use serde::{Deserialize, Serialize};

use super::item::{Equipment, Item};

/// Player combat stats plus inventory and equipment, as reported by the server.
///
/// Any missing field takes its value from [`PlayerStats::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub inventory: Vec<Item>,
    pub equipment: Equipment,
}

impl Default for PlayerStats {
    /// Stats shown before the first dungeon arrives, and substituted when a
    /// dungeon payload omits them.
    fn default() -> Self {
        Self {
            hp: 0,
            max_hp: 0,
            attack: 0,
            defense: 0,
            level: 1,
            xp: 0,
            xp_to_next_level: 100,
            inventory: Vec::new(),
            equipment: Equipment::default(),
        }
    }
}

impl PlayerStats {
    pub fn first_consumable(&self) -> Option<&Item> {
        self.inventory.iter().find(|item| item.consumable)
    }

    pub fn first_equippable(&self) -> Option<&Item> {
        self.inventory.iter().find(|item| item.equippable)
    }
}
