//! Event reducer
//!
//! `apply` is the only place `WorldState` changes. It is pure apart from
//! `tracing` diagnostics: the same state and event always produce the same
//! result, and a batch is a strict left fold in arrival order.
//!
//! Optional payload fields resolve in one order everywhere: the event's value,
//! then the prior state's value where a handler says so, then a fixed default.
//! An event whose missing field leaves nothing meaningful to do is a no-op
//! with a warning.

mod actors;
mod notices;
mod world;

use dungeonsync_domain::WorldState;

use crate::application::events::GameEvent;

/// Apply one event.
pub fn apply(state: WorldState, event: GameEvent) -> WorldState {
    tracing::trace!(kind = event.kind(), "Applying event");
    let mut next = match event {
        GameEvent::DungeonData(load) => world::load_dungeon(state, load),
        GameEvent::PlayerMoved { player_pos } => world::move_player(state, player_pos),
        GameEvent::InvalidMove { reason, player_pos } => {
            world::reject_move(state, reason, player_pos)
        }
        GameEvent::TileChange { pos, new_tile } => world::change_tile(state, pos, new_tile),

        GameEvent::PlayerStatsUpdate { stats } => actors::replace_stats(state, stats),
        GameEvent::EntityDied {
            entity_id,
            entity_type,
            message,
        } => actors::entity_died(state, entity_id, entity_type, message),
        GameEvent::PlayerDied { message } => actors::player_died(state, message),
        GameEvent::MonsterMoved {
            monster_id,
            new_pos,
        } => actors::monster_moved(state, monster_id, new_pos),
        GameEvent::MonsterAppeared { monster } => actors::monster_appeared(state, monster),

        GameEvent::ServerNotice { text } => notices::server_notice(state, text),
        GameEvent::CombatEvent(report) => notices::combat(state, report),
        GameEvent::PlayerLeveledUp { new_level, message } => {
            notices::leveled_up(state, new_level, message)
        }
        GameEvent::Error { message } | GameEvent::ParseError { message } => {
            notices::server_error(state, message)
        }
        GameEvent::Unrecognized { kind } => {
            tracing::warn!(kind = %kind, "Unrecognized server message, ignoring");
            state
        }

        GameEvent::LoadingChanged { loading } => notices::set_loading(state, loading),
        GameEvent::NoticeRaised(message) => notices::raise(state, message),
        GameEvent::NoticeExpired { revision } => notices::expire(state, revision),
        GameEvent::InventorySelected { index } => notices::select(state, index),
    };

    next.enforce_selection_bound();
    next
}

/// Fold a batch, in order.
pub fn apply_batch<I>(state: WorldState, events: I) -> WorldState
where
    I: IntoIterator<Item = GameEvent>,
{
    events.into_iter().fold(state, apply)
}
