//! Protocol-level errors

use thiserror::Error;

/// A frame that could not be turned into a `ServerMessage` (or a
/// `ClientMessage` that could not be serialized).
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Frame is not valid JSON
    #[error("Invalid JSON frame: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Frame is JSON but carries no string `type` tag
    #[error("Frame has no message type")]
    MissingKind,

    /// Frame has a known `type` but its fields do not match
    #[error("Malformed {kind} message: {source}")]
    Malformed {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// Outbound message could not be serialized
    #[error("Failed to encode {action} message: {source}")]
    Encode {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ProtocolError {
    /// The `type` tag of the offending frame, when one could be read.
    pub fn kind(&self) -> Option<&str> {
        match self {
            ProtocolError::Malformed { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
