//! dungeonsync Player crate.
//!
//! Client-side world-state synchronization for the dungeon game:
//! - `infrastructure`: websocket transport, inbound batching, protocol translation
//! - `application`: events, the reducer, the action dispatcher, input mapping
//!   and the session driver that ties them together
//! - `ports`: the outbound seam the dispatcher sends through
//! - `config`: environment-driven client configuration

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;

pub use application::dispatcher::ActionDispatcher;
pub use application::events::{DungeonLoad, GameEvent};
pub use application::input::{Key, KeyPress};
pub use application::reducer::{apply, apply_batch};
pub use application::session::{SessionCommand, SessionDriver, SessionHandle};
pub use config::ClientConfig;
pub use infrastructure::websocket::{
    ConnectionState, FrameBatcher, Transport, TransportError, TransportHandle,
};
pub use ports::outbound::OutboundPort;
