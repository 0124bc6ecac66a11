use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Numeric id of a map cell's kind (floor, wall, door, item, stairs, fog).
pub type TileId = u32;

/// Symbolic tile names shared with the server's `tile_types` table.
pub mod tile_names {
    pub const EMPTY: &str = "EMPTY";
    pub const FLOOR: &str = "FLOOR";
    pub const WALL: &str = "WALL";
    pub const ITEM_POTION: &str = "ITEM_POTION";
    pub const MONSTER_GOBLIN: &str = "MONSTER_GOBLIN";
    pub const MONSTER_ORC: &str = "MONSTER_ORC";
    pub const MONSTER_SKELETON: &str = "MONSTER_SKELETON";
    pub const DOOR_CLOSED: &str = "DOOR_CLOSED";
    pub const DOOR_OPEN: &str = "DOOR_OPEN";
    pub const STAIRS_DOWN: &str = "STAIRS_DOWN";
    pub const FOG: &str = "FOG";
    pub const ITEM_SCROLL_TELEPORT: &str = "ITEM_SCROLL_TELEPORT";
}

const DEFAULT_TILES: [(&str, TileId); 12] = [
    (tile_names::EMPTY, 0),
    (tile_names::FLOOR, 1),
    (tile_names::WALL, 2),
    (tile_names::ITEM_POTION, 3),
    (tile_names::MONSTER_GOBLIN, 4),
    (tile_names::MONSTER_ORC, 5),
    (tile_names::MONSTER_SKELETON, 6),
    (tile_names::DOOR_CLOSED, 7),
    (tile_names::DOOR_OPEN, 8),
    (tile_names::STAIRS_DOWN, 10),
    (tile_names::FOG, 11),
    (tile_names::ITEM_SCROLL_TELEPORT, 12),
];

/// Mapping from symbolic tile name to numeric id.
///
/// Always starts from the built-in table; server overrides are layered on
/// top and win on conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileDefinitions(BTreeMap<String, TileId>);

impl Default for TileDefinitions {
    fn default() -> Self {
        Self(
            DEFAULT_TILES
                .iter()
                .map(|(name, id)| ((*name).to_string(), *id))
                .collect(),
        )
    }
}

impl TileDefinitions {
    /// Defaults merged with `overrides` (server wins).
    pub fn merged_with(overrides: &BTreeMap<String, TileId>) -> Self {
        let mut defs = Self::default();
        for (name, id) in overrides {
            defs.0.insert(name.clone(), *id);
        }
        defs
    }

    pub fn get(&self, name: &str) -> Option<TileId> {
        self.0.get(name).copied()
    }

    pub fn floor(&self) -> Option<TileId> {
        self.get(tile_names::FLOOR)
    }

    /// Reverse lookup.
    pub fn name_of(&self, id: TileId) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
    }

    pub fn contains_id(&self, id: TileId) -> bool {
        self.0.values().any(|v| *v == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_builtin_tile() {
        let defs = TileDefinitions::default();
        assert_eq!(defs.len(), 12);
        assert_eq!(defs.floor(), Some(1));
        assert_eq!(defs.get(tile_names::STAIRS_DOWN), Some(10));
        assert_eq!(defs.name_of(11), Some(tile_names::FOG));
    }

    #[test]
    fn server_overrides_win() {
        let mut overrides = BTreeMap::new();
        overrides.insert("FLOOR".to_string(), 42);
        overrides.insert("LAVA".to_string(), 99);

        let defs = TileDefinitions::merged_with(&overrides);
        assert_eq!(defs.floor(), Some(42));
        assert_eq!(defs.get("LAVA"), Some(99));
        assert_eq!(defs.get(tile_names::WALL), Some(2));
    }
}
