//! Game events consumed by the reducer
//!
//! Inbound server messages are translated into these by
//! `infrastructure::message_translator`; the dispatcher and the session driver
//! produce the local kinds directly. Payload fields stay optional: the reducer
//! is the one place that decides what an absent field means.

use std::collections::BTreeMap;

use dungeonsync_domain::{GameMessage, Monster, MonsterId, PlayerStats, Position, TileId};

/// A full dungeon load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DungeonLoad {
    pub map: Option<Vec<Vec<TileId>>>,
    pub player_start_pos: Option<Position>,
    pub tile_types: Option<BTreeMap<String, TileId>>,
    pub player_stats: Option<PlayerStats>,
    pub monsters: Option<Vec<Monster>>,
    pub seed_used: Option<i64>,
    pub current_dungeon_level: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub message: Option<String>,
    pub attacker_faction: Option<String>,
    pub attacker_id: Option<String>,
    pub defender_faction: Option<String>,
    pub defender_id: Option<String>,
    pub damage_done: Option<i32>,
    pub defender_hp_current: Option<i32>,
    pub defender_hp_max: Option<i32>,
}

impl CombatReport {
    pub const PLAYER_FACTION: &'static str = "player";

    pub fn player_was_hit(&self) -> bool {
        self.defender_faction.as_deref() == Some(Self::PLAYER_FACTION)
    }
}

/// Every state transition the reducer knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    // =========================================================================
    // Server events
    // =========================================================================
    DungeonData(DungeonLoad),
    PlayerMoved {
        player_pos: Option<Position>,
    },
    InvalidMove {
        reason: Option<String>,
        player_pos: Option<Position>,
    },
    TileChange {
        pos: Option<Position>,
        new_tile: Option<TileId>,
    },
    ServerNotice {
        text: Option<String>,
    },
    PlayerStatsUpdate {
        stats: Option<PlayerStats>,
    },
    CombatEvent(CombatReport),
    EntityDied {
        entity_id: Option<String>,
        entity_type: Option<String>,
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
        monster: Option<Monster>,
    },
    PlayerLeveledUp {
        new_level: Option<u32>,
        message: Option<String>,
    },
    Error {
        message: Option<String>,
    },
    /// A frame that could not be decoded, or a server-reported parse failure
    ParseError {
        message: Option<String>,
    },
    /// A well-formed frame of a kind this client does not handle
    Unrecognized {
        kind: String,
    },

    // =========================================================================
    // Local events
    // =========================================================================
    LoadingChanged {
        loading: bool,
    },
    NoticeRaised(GameMessage),
    /// Expiry timer fired for the notice with this revision
    NoticeExpired {
        revision: u64,
    },
    InventorySelected {
        index: Option<usize>,
    },
}

impl GameEvent {
    /// Short name for logs.
    pub fn kind(&self) -> &str {
        match self {
            GameEvent::DungeonData(_) => "dungeon_data",
            GameEvent::PlayerMoved { .. } => "player_moved",
            GameEvent::InvalidMove { .. } => "invalid_move",
            GameEvent::TileChange { .. } => "tile_change",
            GameEvent::ServerNotice { .. } => "game_message",
            GameEvent::PlayerStatsUpdate { .. } => "player_stats_update",
            GameEvent::CombatEvent(_) => "combat_event",
            GameEvent::EntityDied { .. } => "entity_died",
            GameEvent::PlayerDied { .. } => "player_died",
            GameEvent::MonsterMoved { .. } => "monster_moved",
            GameEvent::MonsterAppeared { .. } => "monster_appeared",
            GameEvent::PlayerLeveledUp { .. } => "player_leveled_up",
            GameEvent::Error { .. } => "error",
            GameEvent::ParseError { .. } => "parse_error",
            GameEvent::Unrecognized { kind } => kind,
            GameEvent::LoadingChanged { .. } => "loading_changed",
            GameEvent::NoticeRaised(_) => "notice_raised",
            GameEvent::NoticeExpired { .. } => "notice_expired",
            GameEvent::InventorySelected { .. } => "inventory_selected",
        }
    }

    /// Whether this event originates on the client rather than the server.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            GameEvent::LoadingChanged { .. }
                | GameEvent::NoticeRaised(_)
                | GameEvent::NoticeExpired { .. }
                | GameEvent::InventorySelected { .. }
        )
    }

    pub fn notice(message: GameMessage) -> Self {
        GameEvent::NoticeRaised(message)
    }
}
