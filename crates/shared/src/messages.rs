//! WebSocket message types for server-client communication
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown inbound `type` tags deserialize to `ServerMessage::Unknown`
//! - Every inbound field is `Option`: servers in the wild omit fields, and
//!   the client resolves each absence explicitly

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dungeonsync_domain::{
    EquipmentSlot, ItemId, Monster, MonsterId, PlayerStats, Position, TileId,
};

use crate::lenient;

// =============================================================================
// Client Messages (Client → Server)
// =============================================================================

/// Actions from the client to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Request a new dungeon (or the next level)
    GenerateDungeon { seed: Option<i64> },
    /// Ask to move the player; the server answers with player_moved or invalid_move
    PlayerMove { new_pos: Position },
    /// Use an inventory item
    UseItem { item_id: ItemId },
    /// Equip an inventory item
    EquipItem { item_id: ItemId },
    /// Unequip whatever is in a slot
    UnequipItem { slot: EquipmentSlot },
}

impl ClientMessage {
    /// Wire name of the action, for logs and error messages.
    pub fn action(&self) -> &'static str {
        match self {
            ClientMessage::GenerateDungeon { .. } => "generate_dungeon",
            ClientMessage::PlayerMove { .. } => "player_move",
            ClientMessage::UseItem { .. } => "use_item",
            ClientMessage::EquipItem { .. } => "equip_item",
            ClientMessage::UnequipItem { .. } => "unequip_item",
        }
    }
}

// =============================================================================
// Server Messages (Server → Client)
// =============================================================================

/// Full dungeon load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonDataPayload {
    pub map: Option<Vec<Vec<TileId>>>,
    pub player_start_pos: Option<Position>,
    pub tile_types: Option<BTreeMap<String, TileId>>,
    pub player_stats: Option<PlayerStats>,
    /// Entries that fail to decode are dropped one by one
    #[serde(default, deserialize_with = "lenient::list")]
    pub monsters: Option<Vec<Monster>>,
    pub seed_used: Option<i64>,
    pub current_dungeon_level: Option<u32>,
}

/// One exchange of blows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEventPayload {
    pub message: Option<String>,
    pub attacker_faction: Option<String>,
    pub attacker_id: Option<String>,
    pub attacker_type: Option<String>,
    pub defender_faction: Option<String>,
    pub defender_id: Option<String>,
    pub defender_type: Option<String>,
    pub damage_done: Option<i32>,
    pub defender_hp_current: Option<i32>,
    pub defender_hp_max: Option<i32>,
}

/// Events from the server to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    DungeonData(DungeonDataPayload),

    PlayerMoved {
        player_pos: Option<Position>,
    },

    /// Server rejected a move; `player_pos` is the authoritative position
    InvalidMove {
        reason: Option<String>,
        player_pos: Option<Position>,
    },

    TileChange {
        pos: Option<Position>,
        new_tile_type: Option<TileId>,
    },

    GameMessage {
        text: Option<String>,
    },

    PlayerStatsUpdate {
        stats: Option<PlayerStats>,
    },

    CombatEvent(CombatEventPayload),

    EntityDied {
        entity_id: Option<String>,
        entity_type: Option<String>,
        pos: Option<Position>,
        message: Option<String>,
    },

    PlayerDied {
        message: Option<String>,
    },

    MonsterMoved {
        monster_id: Option<MonsterId>,
        new_pos: Option<Position>,
    },

    MonsterAppeared {
        monster_info: Option<Monster>,
    },

    PlayerLeveledUp {
        new_level: Option<u32>,
        message: Option<String>,
    },

    Error {
        message: Option<String>,
    },

    ParseError {
        message: Option<String>,
    },

    /// Unknown message type for forward compatibility
    ///
    /// When deserializing an unknown variant, this variant is used instead of
    /// failing. The codec keeps the raw tag for diagnostics.
    #[serde(other)]
    Unknown,
}
