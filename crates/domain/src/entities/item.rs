//! Inventory items and equipment slots

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::ids::ItemId;

/// An item in the player's inventory or equipment.
///
/// Plain data mirrored from the server; the client never edits items, it
/// only replaces them wholesale on stats updates. Only `id` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub type_key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub consumable: bool,
    #[serde(default)]
    pub equippable: bool,
    #[serde(default)]
    pub slot: Option<EquipmentSlot>,
    #[serde(default)]
    pub attack_bonus: Option<i32>,
    #[serde(default)]
    pub defense_bonus: Option<i32>,
    #[serde(default)]
    pub effect_value: Option<Number>,
}

fn default_quantity() -> u32 {
    1
}

/// Fixed set of equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

impl EquipmentSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Armor => "armor",
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equipped items by slot. Serialized as `{"weapon": ..., "armor": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub weapon: Option<Item>,
    #[serde(default)]
    pub armor: Option<Item>,
}

impl Equipment {
    pub fn get(&self, slot: EquipmentSlot) -> Option<&Item> {
        match slot {
            EquipmentSlot::Weapon => self.weapon.as_ref(),
            EquipmentSlot::Armor => self.armor.as_ref(),
        }
    }

    pub fn is_occupied(&self, slot: EquipmentSlot) -> bool {
        self.get(slot).is_some()
    }
}
