//! WorldState aggregate - the client-held snapshot of the game
//!
//! # Lifecycle
//!
//! - Created with fixed defaults at session start (`WorldState::default()`).
//! - Wholesale-replaced when a full dungeon load arrives.
//! - Patched field by field by every other event kind.
//!
//! # Invariants
//!
//! - `map` rows are all the same length (guaranteed by `DungeonMap`).
//! - Monster ids are unique within `monsters`.
//! - `selected_inventory_index`, when set, is `< inventory().len()`.
//!
//! This is a plain data struct: the reducer owns every transition and calls
//! [`WorldState::enforce_selection_bound`] after each one.

use crate::entities::{Equipment, Item, Monster, PlayerStats};
use crate::ids::MonsterId;
use crate::map::DungeonMap;
use crate::value_objects::{GameMessage, Position, TileDefinitions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldState {
    pub map: Option<DungeonMap>,
    pub player_pos: Option<Position>,
    pub tile_definitions: TileDefinitions,
    pub game_message: GameMessage,
    /// Bumped every time `game_message` is set; expiry timers carry the
    /// revision they were scheduled for.
    pub message_revision: u64,
    pub loading: bool,
    pub player_stats: PlayerStats,
    pub monsters: Vec<Monster>,
    pub is_game_over: bool,
    pub current_dungeon_level: u32,
    pub selected_inventory_index: Option<usize>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            map: None,
            player_pos: None,
            tile_definitions: TileDefinitions::default(),
            game_message: GameMessage::default(),
            message_revision: 0,
            loading: true,
            player_stats: PlayerStats::default(),
            monsters: Vec::new(),
            is_game_over: false,
            current_dungeon_level: 1,
            selected_inventory_index: None,
        }
    }
}

impl WorldState {
    pub fn inventory(&self) -> &[Item] {
        &self.player_stats.inventory
    }

    pub fn equipment(&self) -> &Equipment {
        &self.player_stats.equipment
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.selected_inventory_index
            .and_then(|idx| self.player_stats.inventory.get(idx))
    }

    pub fn monster(&self, id: &MonsterId) -> Option<&Monster> {
        self.monsters.iter().find(|m| &m.id == id)
    }

    /// Replace the notice and bump the revision.
    pub fn set_message(&mut self, message: GameMessage) {
        self.game_message = message;
        self.message_revision = self.message_revision.wrapping_add(1);
    }

    /// Clear a selection that no longer points into the inventory.
    pub fn enforce_selection_bound(&mut self) {
        if let Some(idx) = self.selected_inventory_index {
            if idx >= self.player_stats.inventory.len() {
                self.selected_inventory_index = None;
            }
        }
    }
}
