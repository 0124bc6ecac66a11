pub mod message_translator;
pub mod websocket;

pub use websocket::{ConnectionState, Transport, TransportError, TransportHandle};
