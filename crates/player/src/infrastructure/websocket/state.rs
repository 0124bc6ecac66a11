//! Connection lifecycle state.

use std::fmt;

use tokio::sync::watch;

/// Connection state of the dungeon websocket.
///
/// There is no reconnect state: once `Errored` or `Closed`, a session needs a
/// fresh [`Transport`](super::Transport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Transport created, `connect()` not called yet
    #[default]
    Idle,
    /// Handshake in progress
    Connecting,
    /// Frames may be sent and received
    Open,
    /// Connect failed or the socket reported an error
    Errored,
    /// Closed by either side
    Closed,
}

impl ConnectionState {
    pub fn is_open(self) -> bool {
        self == ConnectionState::Open
    }

    /// `Errored` and `Closed` never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(self, ConnectionState::Errored | ConnectionState::Closed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Errored => "errored",
            ConnectionState::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Move the published state forward. Terminal states are sticky, so a socket
/// error reported after an orderly close does not overwrite `Closed`.
///
/// Returns whether the state changed.
pub(crate) fn advance(state: &watch::Sender<ConnectionState>, next: ConnectionState) -> bool {
    state.send_if_modified(|current| {
        if current.is_terminal() || *current == next {
            return false;
        }
        tracing::debug!(from = %current, to = %next, "Connection state change");
        *current = next;
        true
    })
}
