//! Dungeon grid and the floor-connectivity check

mod connectivity;
mod grid;

pub use connectivity::{
    check_connectivity, ensure_connected, is_fully_connected, ConnectivityReport,
};
pub use grid::DungeonMap;
