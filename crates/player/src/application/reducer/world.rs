//! Map-level transitions: full loads, player position, tile patches.

use dungeonsync_domain::{
    is_fully_connected, DungeonMap, GameMessage, Monster, Position, TileDefinitions, TileId,
    WorldState,
};

use crate::application::events::DungeonLoad;

/// Replace the world with a fresh dungeon.
///
/// A load without a usable map keeps the previous world, clears `loading`
/// and raises a persistent error so the player can request again.
pub(super) fn load_dungeon(state: WorldState, load: DungeonLoad) -> WorldState {
    let DungeonLoad {
        map,
        player_start_pos,
        tile_types,
        player_stats,
        monsters,
        seed_used,
        current_dungeon_level,
    } = load;

    let (Some(rows), Some(start)) = (map, player_start_pos) else {
        tracing::warn!("dungeon_data without map or player_start_pos");
        return reject_load(state, "Dungeon data is incomplete.");
    };

    let map = match DungeonMap::from_rows(rows) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected dungeon_data");
            return reject_load(state, &e.to_string());
        }
    };

    let tile_definitions = tile_types
        .map(|overrides| TileDefinitions::merged_with(&overrides))
        .unwrap_or_default();

    let unknown_cells = map
        .cells()
        .filter(|(_, tile)| !tile_definitions.contains_id(*tile))
        .count();
    if unknown_cells > 0 {
        tracing::warn!(
            unknown_cells,
            "Loaded dungeon uses tile ids missing from the tile table"
        );
    }

    if !is_fully_connected(map.rows(), start, &tile_definitions) {
        tracing::warn!(
            width = map.width(),
            height = map.height(),
            start = %start,
            "Loaded dungeon has floor cells unreachable from the start"
        );
    }

    let level = current_dungeon_level
        .filter(|level| *level > 0)
        .unwrap_or(state.current_dungeon_level)
        .max(1);
    let seed = seed_used.map_or_else(|| "N/A".to_string(), |seed| seed.to_string());

    let mut next = WorldState {
        map: Some(map),
        player_pos: Some(start),
        tile_definitions,
        game_message: state.game_message,
        message_revision: state.message_revision,
        loading: false,
        player_stats: player_stats.unwrap_or_default(),
        monsters: unique_by_id(monsters.unwrap_or_default()),
        is_game_over: false,
        current_dungeon_level: level,
        selected_inventory_index: None,
    };
    next.set_message(GameMessage::info(
        format!("Entered Dungeon Level {level} (Seed: {seed})."),
        GameMessage::MILESTONE_MS,
    ));
    next
}

fn reject_load(mut state: WorldState, detail: &str) -> WorldState {
    state.loading = false;
    state.set_message(GameMessage::error(
        format!("Error: {detail}"),
        GameMessage::PERSISTENT,
    ));
    state
}

/// Later duplicates replace earlier ones in place.
fn unique_by_id(monsters: Vec<Monster>) -> Vec<Monster> {
    let mut unique: Vec<Monster> = Vec::with_capacity(monsters.len());
    for monster in monsters {
        match unique.iter_mut().find(|m| m.id == monster.id) {
            Some(existing) => *existing = monster,
            None => unique.push(monster),
        }
    }
    unique
}

pub(super) fn move_player(mut state: WorldState, player_pos: Option<Position>) -> WorldState {
    match player_pos {
        Some(pos) => state.player_pos = Some(pos),
        None => tracing::warn!("player_moved without player_pos, ignoring"),
    }
    state
}

/// The server is authoritative: snap back to its position.
pub(super) fn reject_move(
    mut state: WorldState,
    reason: Option<String>,
    player_pos: Option<Position>,
) -> WorldState {
    if let Some(pos) = player_pos {
        state.player_pos = Some(pos);
    }
    let reason = reason.unwrap_or_else(|| "Blocked.".to_string());
    state.set_message(GameMessage::error(
        format!("Invalid move: {reason}"),
        GameMessage::INFO_MS,
    ));
    state
}

pub(super) fn change_tile(
    mut state: WorldState,
    pos: Option<Position>,
    new_tile: Option<TileId>,
) -> WorldState {
    let (Some(pos), Some(tile)) = (pos, new_tile) else {
        tracing::warn!("tile_change without pos or new_tile_type, ignoring");
        return state;
    };
    let Some(map) = state.map.as_ref() else {
        tracing::warn!(pos = %pos, "tile_change before any dungeon was loaded, ignoring");
        return state;
    };
    let Some(name) = state.tile_definitions.name_of(tile) else {
        tracing::warn!(pos = %pos, tile, "tile_change to an unknown tile id, ignoring");
        return state;
    };

    match map.with_tile(pos, tile) {
        Ok(patched) => {
            tracing::debug!(pos = %pos, tile = name, "Tile changed");
            state.map = Some(patched);
        }
        Err(e) => tracing::warn!(error = %e, "tile_change out of bounds, ignoring"),
    }
    state
}
