//! Frame codec: text frames in, typed messages out (and back)

use serde_json::Value;

use crate::error::ProtocolError;
use crate::messages::{ClientMessage, ServerMessage};

/// A successfully decoded inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// The raw `type` tag, preserved so `Unknown` frames can still be named.
    pub kind: String,
    pub message: ServerMessage,
}

/// Decode a single websocket text frame.
///
/// Unrecognized `type` tags are not an error: they decode to
/// [`ServerMessage::Unknown`] with the tag kept in [`DecodedFrame::kind`].
pub fn decode_server_frame(text: &str) -> Result<DecodedFrame, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(ProtocolError::InvalidJson)?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(ProtocolError::MissingKind)?;

    let message = serde_json::from_value::<ServerMessage>(value).map_err(|source| {
        ProtocolError::Malformed {
            kind: kind.clone(),
            source,
        }
    })?;

    if matches!(message, ServerMessage::Unknown) {
        tracing::debug!(kind = %kind, "Decoded frame with unrecognized type");
    }

    Ok(DecodedFrame { kind, message })
}

/// Serialize an outbound action to its wire text.
pub fn encode_client_message(message: &ClientMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(|source| ProtocolError::Encode {
        action: message.action(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeonsync_domain::{ItemId, Position};

    #[test]
    fn decodes_known_frame() {
        let frame = decode_server_frame(r#"{"type":"player_moved","player_pos":{"x":3,"y":4}}"#)
            .expect("decode");
        assert_eq!(frame.kind, "player_moved");
        assert_eq!(
            frame.message,
            ServerMessage::PlayerMoved {
                player_pos: Some(Position::new(3, 4))
            }
        );
    }

    #[test]
    fn unknown_type_keeps_its_tag() {
        let frame = decode_server_frame(r#"{"type":"weather","rain":true}"#).expect("decode");
        assert_eq!(frame.kind, "weather");
        assert_eq!(frame.message, ServerMessage::Unknown);
    }

    #[test]
    fn invalid_json_is_rejected() {
        let err = decode_server_frame("{not json").expect_err("should fail");
        assert!(matches!(err, ProtocolError::InvalidJson(_)));
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn missing_type_is_rejected() {
        let err = decode_server_frame(r#"{"player_pos":{"x":1,"y":1}}"#).expect_err("should fail");
        assert!(matches!(err, ProtocolError::MissingKind));

        let err = decode_server_frame(r#"{"type":7}"#).expect_err("should fail");
        assert!(matches!(err, ProtocolError::MissingKind));
    }

    #[test]
    fn wrong_field_shape_is_malformed() {
        let err = decode_server_frame(r#"{"type":"player_moved","player_pos":"north"}"#)
            .expect_err("should fail");
        assert_eq!(err.kind(), Some("player_moved"));
    }

    #[test]
    fn encodes_use_item() {
        let text = encode_client_message(&ClientMessage::UseItem {
            item_id: ItemId::new("potion-1"),
        })
        .expect("encode");
        let value: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["action"], "use_item");
        assert_eq!(value["item_id"], "potion-1");
    }
}
