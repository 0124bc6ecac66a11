//! Game Connection Port - the single outbound seam to the dungeon server

use dungeonsync_shared::ClientMessage;

use crate::infrastructure::websocket::TransportError;

/// Port for sending player actions to the server
///
/// Implemented by `TransportHandle`. Every network send in the client goes
/// through the action dispatcher, which owns one of these.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait OutboundPort: Send + Sync {
    /// Queue a message for the server
    ///
    /// Fails with `TransportError::NotOpen` unless the connection is open.
    fn send(&self, message: ClientMessage) -> Result<(), TransportError>;

    /// Whether the connection is currently open
    fn is_open(&self) -> bool;
}
