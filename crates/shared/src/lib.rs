//! dungeonsync Protocol - Shared types for server and client communication
//!
//! This crate contains the wire format spoken over the dungeon websocket:
//! - `ServerMessage`: inbound events, tagged by `type`
//! - `ClientMessage`: outbound actions, tagged by `action`
//! - Frame codec helpers that classify decode failures
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde, serde_json, thiserror, tracing
//! 2. **No business logic** - pure data types and serialization
//! 3. **Lenient inbound shapes** - every inbound field is optional; the client
//!    decides the fallback for each one in a single place

pub mod codec;
pub mod error;
mod lenient;
pub mod messages;

pub use codec::{decode_server_frame, encode_client_message, DecodedFrame};
pub use error::ProtocolError;
pub use messages::{ClientMessage, CombatEventPayload, DungeonDataPayload, ServerMessage};
