//! WebSocket transport for the dungeon server connection
//!
//! - `client`: tokio-tungstenite transport, reader and writer tasks
//! - `batcher`: groups frames that arrive within one scheduler tick
//! - `state`: connection lifecycle published through a `watch` channel

mod batcher;
mod client;
mod error;
mod state;

pub use batcher::FrameBatcher;
pub use client::{Transport, TransportHandle};
pub use error::TransportError;
pub use state::ConnectionState;
