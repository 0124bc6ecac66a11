//! Outbound ports - Interfaces for external services
//!
//! The dispatcher sends through these contracts rather than the concrete
//! websocket transport, so it can be driven by a mock in tests.

pub mod game_connection_port;

pub use game_connection_port::OutboundPort;

#[cfg(any(test, feature = "testing"))]
pub use game_connection_port::MockOutboundPort;
