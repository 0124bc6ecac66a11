//! Player and monster transitions.

use dungeonsync_domain::{GameMessage, Monster, MonsterId, PlayerStats, Position, WorldState};

const PLAYER_ENTITY: &str = "player";

pub(super) fn replace_stats(mut state: WorldState, stats: Option<PlayerStats>) -> WorldState {
    match stats {
        Some(stats) => state.player_stats = stats,
        None => tracing::warn!("player_stats_update without stats, ignoring"),
    }
    state
}

pub(super) fn entity_died(
    mut state: WorldState,
    entity_id: Option<String>,
    entity_type: Option<String>,
    message: Option<String>,
) -> WorldState {
    if entity_type.as_deref() != Some(PLAYER_ENTITY) {
        match entity_id {
            Some(id) => state.monsters.retain(|m| m.id.as_str() != id),
            None => tracing::warn!("entity_died without entity_id, monster list untouched"),
        }
    }
    match message {
        Some(text) => state.set_message(GameMessage::info(text, GameMessage::DEATH_NOTICE_MS)),
        None => tracing::debug!("entity_died without message"),
    }
    state
}

pub(super) fn player_died(mut state: WorldState, message: Option<String>) -> WorldState {
    state.is_game_over = true;
    let text = message.unwrap_or_else(|| "You have died.".to_string());
    state.set_message(GameMessage::error(text, GameMessage::PERSISTENT));
    state
}

pub(super) fn monster_moved(
    mut state: WorldState,
    monster_id: Option<MonsterId>,
    new_pos: Option<Position>,
) -> WorldState {
    let (Some(id), Some(pos)) = (monster_id, new_pos) else {
        tracing::warn!("monster_moved without monster_id or new_pos, ignoring");
        return state;
    };
    match state.monsters.iter_mut().find(|m| m.id == id) {
        Some(monster) => *monster = monster.moved_to(pos),
        None => tracing::debug!(monster_id = %id, "monster_moved for unknown monster"),
    }
    state
}

pub(super) fn monster_appeared(mut state: WorldState, monster: Option<Monster>) -> WorldState {
    let Some(monster) = monster else {
        tracing::warn!("monster_appeared without monster_info, ignoring");
        return state;
    };
    match state.monsters.iter_mut().find(|m| m.id == monster.id) {
        Some(existing) => {
            tracing::debug!(
                monster_id = %monster.id,
                "monster_appeared for known monster, replacing"
            );
            *existing = monster;
        }
        None => state.monsters.push(monster),
    }
    state
}
