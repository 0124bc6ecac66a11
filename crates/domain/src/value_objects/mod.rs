//! Value objects - Immutable objects defined by their attributes

mod game_message;
mod position;
mod tile;

pub use game_message::GameMessage;
pub use position::Position;
pub use tile::{tile_names, TileDefinitions, TileId};
