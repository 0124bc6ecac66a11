//! Translates protocol `ServerMessage`s into application `GameEvent`s
//!
//! Keeps the reducer independent of the wire format. Decode failures are not
//! dropped here: they become `GameEvent::ParseError` so they land at their
//! arrival position in the batch.

use dungeonsync_shared::{
    CombatEventPayload, DecodedFrame, DungeonDataPayload, ProtocolError, ServerMessage,
};

use crate::application::events::{CombatReport, DungeonLoad, GameEvent};

/// Result of decoding one inbound text frame.
pub type InboundFrame = Result<DecodedFrame, ProtocolError>;

/// Translate one decoded-or-failed frame.
pub fn translate_frame(frame: InboundFrame) -> GameEvent {
    match frame {
        Ok(DecodedFrame { kind, message }) => translate(kind, message),
        Err(e) => {
            tracing::warn!(error = %e, kind = e.kind(), "Failed to parse server frame");
            GameEvent::ParseError {
                message: Some(e.to_string()),
            }
        }
    }
}

/// Translate a ServerMessage into a GameEvent.
///
/// `kind` is the raw `type` tag, only used to name unrecognized messages.
pub fn translate(kind: String, msg: ServerMessage) -> GameEvent {
    match msg {
        ServerMessage::DungeonData(payload) => GameEvent::DungeonData(translate_dungeon(payload)),

        ServerMessage::PlayerMoved { player_pos } => GameEvent::PlayerMoved { player_pos },

        ServerMessage::InvalidMove { reason, player_pos } => {
            GameEvent::InvalidMove { reason, player_pos }
        }

        ServerMessage::TileChange { pos, new_tile_type } => GameEvent::TileChange {
            pos,
            new_tile: new_tile_type,
        },

        ServerMessage::GameMessage { text } => GameEvent::ServerNotice { text },

        ServerMessage::PlayerStatsUpdate { stats } => GameEvent::PlayerStatsUpdate { stats },

        ServerMessage::CombatEvent(payload) => GameEvent::CombatEvent(translate_combat(payload)),

        // `pos` is informational only; the monster list is keyed by id
        ServerMessage::EntityDied {
            entity_id,
            entity_type,
            message,
            ..
        } => GameEvent::EntityDied {
            entity_id,
            entity_type,
            message,
        },

        ServerMessage::PlayerDied { message } => GameEvent::PlayerDied { message },

        ServerMessage::MonsterMoved {
            monster_id,
            new_pos,
        } => GameEvent::MonsterMoved {
            monster_id,
            new_pos,
        },

        ServerMessage::MonsterAppeared { monster_info } => GameEvent::MonsterAppeared {
            monster: monster_info,
        },

        ServerMessage::PlayerLeveledUp { new_level, message } => {
            GameEvent::PlayerLeveledUp { new_level, message }
        }

        ServerMessage::Error { message } => GameEvent::Error { message },

        ServerMessage::ParseError { message } => GameEvent::ParseError { message },

        ServerMessage::Unknown => GameEvent::Unrecognized { kind },
    }
}

fn translate_dungeon(payload: DungeonDataPayload) -> DungeonLoad {
    DungeonLoad {
        map: payload.map,
        player_start_pos: payload.player_start_pos,
        tile_types: payload.tile_types,
        player_stats: payload.player_stats,
        monsters: payload.monsters,
        seed_used: payload.seed_used,
        current_dungeon_level: payload.current_dungeon_level,
    }
}

fn translate_combat(payload: CombatEventPayload) -> CombatReport {
    CombatReport {
        message: payload.message,
        attacker_faction: payload.attacker_faction,
        attacker_id: payload.attacker_id,
        defender_faction: payload.defender_faction,
        defender_id: payload.defender_id,
        damage_done: payload.damage_done,
        defender_hp_current: payload.defender_hp_current,
        defender_hp_max: payload.defender_hp_max,
    }
}
