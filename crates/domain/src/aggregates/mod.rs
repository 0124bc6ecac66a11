//! Aggregates - the consistency boundary the client reducer operates on

mod world_state;

pub use world_state::WorldState;
