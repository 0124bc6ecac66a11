//! Transport errors

use thiserror::Error;

use dungeonsync_shared::ProtocolError;

use super::state::ConnectionState;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    #[error("Connection is not open (state: {state})")]
    NotOpen { state: ConnectionState },

    #[error("Outbound queue is full")]
    QueueFull,

    #[error("Connection writer has shut down")]
    WriterGone,

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl TransportError {
    /// Whether the failure means the server is unreachable, as opposed to a
    /// problem with one particular message.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            TransportError::Connect { .. }
                | TransportError::NotOpen { .. }
                | TransportError::WriterGone
        )
    }
}
