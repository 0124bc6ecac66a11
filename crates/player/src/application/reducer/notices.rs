//! Notice-only server events, error reports, and the local UI events.

use dungeonsync_domain::{GameMessage, WorldState};

use crate::application::events::CombatReport;

fn notify(
    mut state: WorldState,
    kind: &str,
    text: Option<String>,
    build: fn(String) -> GameMessage,
) -> WorldState {
    match text {
        Some(text) => state.set_message(build(text)),
        None => tracing::warn!(kind, "Event without message text, ignoring"),
    }
    state
}

pub(super) fn server_notice(state: WorldState, text: Option<String>) -> WorldState {
    notify(state, "game_message", text, |text| {
        GameMessage::info(text, GameMessage::INFO_MS)
    })
}

pub(super) fn combat(state: WorldState, report: CombatReport) -> WorldState {
    tracing::debug!(
        attacker = report.attacker_id.as_deref().unwrap_or("?"),
        defender = report.defender_id.as_deref().unwrap_or("?"),
        damage = report.damage_done,
        defender_hp = report.defender_hp_current,
        "Combat exchange"
    );
    if report.player_was_hit() {
        notify(state, "combat_event", report.message, |text| {
            GameMessage::error(text, GameMessage::INFO_MS)
        })
    } else {
        notify(state, "combat_event", report.message, |text| {
            GameMessage::info(text, GameMessage::INFO_MS)
        })
    }
}

/// Stats arrive separately through player_stats_update.
pub(super) fn leveled_up(
    state: WorldState,
    new_level: Option<u32>,
    message: Option<String>,
) -> WorldState {
    tracing::info!(new_level, "Player leveled up");
    notify(state, "player_leveled_up", message, |text| {
        GameMessage::info(text, GameMessage::MILESTONE_MS)
    })
}

/// `error` and `parse_error` both end any pending load.
pub(super) fn server_error(mut state: WorldState, message: Option<String>) -> WorldState {
    state.loading = false;
    let detail = message.unwrap_or_else(|| "Data issue.".to_string());
    state.set_message(GameMessage::error(
        format!("Error: {detail}"),
        GameMessage::PERSISTENT,
    ));
    state
}

pub(super) fn set_loading(mut state: WorldState, loading: bool) -> WorldState {
    state.loading = loading;
    state
}

pub(super) fn raise(mut state: WorldState, message: GameMessage) -> WorldState {
    state.set_message(message);
    state
}

/// Stale timers (for a notice that has since been replaced) do nothing.
pub(super) fn expire(mut state: WorldState, revision: u64) -> WorldState {
    if state.message_revision == revision {
        state.game_message = GameMessage::cleared();
    }
    state
}

pub(super) fn select(mut state: WorldState, index: Option<usize>) -> WorldState {
    state.selected_inventory_index = index.filter(|idx| *idx < state.inventory().len());
    state
}
