//! dungeonsync domain layer.
//!
//! Pure data model for the client-held dungeon world: the `WorldState`
//! aggregate, its entities and value objects, and the map invariants
//! (rectangular grids, floor connectivity). Nothing in here performs I/O.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod map;
pub mod value_objects;

pub use aggregates::WorldState;

pub use entities::{Equipment, EquipmentSlot, Item, Monster, PlayerStats};

pub use error::DomainError;

pub use ids::{ItemId, MonsterId};

pub use map::{
    check_connectivity, ensure_connected, is_fully_connected, ConnectivityReport, DungeonMap,
};

pub use value_objects::{tile_names, GameMessage, Position, TileDefinitions, TileId};
