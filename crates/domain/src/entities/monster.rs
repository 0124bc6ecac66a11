use serde::{Deserialize, Serialize};

use crate::ids::MonsterId;
use crate::value_objects::{Position, TileId};

/// A monster visible to the client. Only position and tile id ever change.
///
/// `id`, `x` and `y` are required. A missing `type` is empty and a missing
/// `tile_id` is 0, which matches no monster tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub tile_id: TileId,
}

impl Monster {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Copy of this monster standing at `pos`.
    pub fn moved_to(&self, pos: Position) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            ..self.clone()
        }
    }
}
