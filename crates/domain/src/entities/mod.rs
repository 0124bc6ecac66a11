//! Entities held inside the world state

mod item;
mod monster;
mod player_stats;

pub use item::{Equipment, EquipmentSlot, Item};
pub use monster::Monster;
pub use player_stats::PlayerStats;
