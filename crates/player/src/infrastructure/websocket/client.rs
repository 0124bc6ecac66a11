//! Desktop WebSocket transport using tokio-tungstenite

use std::sync::Arc;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch, Notify};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use dungeonsync_shared::{decode_server_frame, encode_client_message, ClientMessage};

use super::batcher::FrameBatcher;
use super::error::TransportError;
use super::state::{advance, ConnectionState};
use crate::infrastructure::message_translator::InboundFrame;
use crate::ports::outbound::OutboundPort;

/// An unconnected transport.
///
/// Subscribe to its state before calling [`Transport::connect`] to observe the
/// whole lifecycle, including a failed handshake.
pub struct Transport {
    url: String,
    queue_capacity: usize,
    state: Arc<watch::Sender<ConnectionState>>,
}

impl Transport {
    pub fn new(url: impl Into<String>, queue_capacity: usize) -> Self {
        let (state, _) = watch::channel(ConnectionState::Idle);
        Self {
            url: url.into(),
            queue_capacity: queue_capacity.max(1),
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Open the connection and spawn the reader and writer tasks.
    ///
    /// Returns the send/close handle and the inbound batch source. There is
    /// no retry: on failure the state is left at `Errored`.
    pub async fn connect(self) -> Result<(TransportHandle, FrameBatcher), TransportError> {
        advance(&self.state, ConnectionState::Connecting);

        let ws_stream = match connect_async(self.url.as_str()).await {
            Ok((ws_stream, _response)) => ws_stream,
            Err(source) => {
                tracing::error!(
                    url = %self.url,
                    error = %source,
                    "Failed to connect to dungeon server"
                );
                advance(&self.state, ConnectionState::Errored);
                return Err(TransportError::Connect {
                    url: self.url,
                    source,
                });
            }
        };

        tracing::info!("Connected to dungeon server at {}", self.url);
        advance(&self.state, ConnectionState::Open);

        let (write, read) = ws_stream.split();
        let (outbound_tx, outbound_rx) = mpsc::channel::<String>(self.queue_capacity);
        let (frames_tx, frames_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(Notify::new());

        tokio::spawn(read_loop(read, frames_tx, Arc::clone(&self.state)));
        tokio::spawn(write_loop(
            write,
            outbound_rx,
            Arc::clone(&shutdown),
            Arc::clone(&self.state),
        ));

        let handle = TransportHandle {
            outbound: outbound_tx,
            state: self.state.subscribe(),
            shutdown,
        };
        Ok((handle, FrameBatcher::new(frames_rx)))
    }
}

async fn read_loop<S>(
    mut read: S,
    frames: mpsc::UnboundedSender<InboundFrame>,
    state: Arc<watch::Sender<ConnectionState>>,
) where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if frames.send(decode_server_frame(&text)).is_err() {
                    tracing::debug!("Frame batcher dropped, stopping reader");
                    break;
                }
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "Server closed connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                advance(&state, ConnectionState::Errored);
                return;
            }
        }
    }
    advance(&state, ConnectionState::Closed);
}

async fn write_loop<W>(
    mut write: W,
    mut outbound: mpsc::Receiver<String>,
    shutdown: Arc<Notify>,
    state: Arc<watch::Sender<ConnectionState>>,
) where
    W: Sink<Message, Error = WsError> + Unpin,
{
    loop {
        tokio::select! {
            next = outbound.recv() => {
                let Some(text) = next else {
                    break;
                };
                if let Err(e) = write.send(Message::Text(text)).await {
                    tracing::error!("Failed to send message: {}", e);
                    advance(&state, ConnectionState::Errored);
                    return;
                }
            }
            _ = shutdown.notified() => {
                tracing::info!("Closing connection");
                if let Err(e) = write.send(Message::Close(None)).await {
                    tracing::warn!("Failed to send close frame: {}", e);
                }
                advance(&state, ConnectionState::Closed);
                return;
            }
        }
    }

    // Every handle was dropped
    if let Err(e) = write.close().await {
        tracing::debug!("Error while closing socket: {}", e);
    }
    advance(&state, ConnectionState::Closed);
}

/// Owned handle to an open connection.
///
/// Cloning shares the same connection. Dropping every clone closes the
/// socket; [`TransportHandle::close`] does so explicitly.
#[derive(Clone)]
pub struct TransportHandle {
    outbound: mpsc::Sender<String>,
    state: watch::Receiver<ConnectionState>,
    shutdown: Arc<Notify>,
}

impl TransportHandle {
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Serialize and queue a message. Only succeeds while `Open`.
    pub fn send(&self, message: ClientMessage) -> Result<(), TransportError> {
        let state = self.state();
        if !state.is_open() {
            return Err(TransportError::NotOpen { state });
        }

        let text = encode_client_message(&message)?;
        self.outbound.try_send(text).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::QueueFull,
            TrySendError::Closed(_) => TransportError::WriterGone,
        })?;

        tracing::debug!(action = message.action(), "Queued outbound message");
        Ok(())
    }

    /// Request an orderly shutdown. The state becomes `Closed` once the
    /// writer has sent the close frame.
    pub fn close(&self) {
        self.shutdown.notify_one();
    }
}

impl OutboundPort for TransportHandle {
    fn send(&self, message: ClientMessage) -> Result<(), TransportError> {
        TransportHandle::send(self, message)
    }

    fn is_open(&self) -> bool {
        self.state().is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use dungeonsync_domain::Position;
    use tokio::net::TcpListener;

    use crate::application::events::GameEvent;

    fn detached_handle(
        initial: ConnectionState,
        capacity: usize,
    ) -> (
        TransportHandle,
        mpsc::Receiver<String>,
        watch::Sender<ConnectionState>,
    ) {
        let (state_tx, state_rx) = watch::channel(initial);
        let (outbound, rx) = mpsc::channel(capacity);
        let handle = TransportHandle {
            outbound,
            state: state_rx,
            shutdown: Arc::new(Notify::new()),
        };
        (handle, rx, state_tx)
    }

    fn move_to(x: i32, y: i32) -> ClientMessage {
        ClientMessage::PlayerMove {
            new_pos: Position::new(x, y),
        }
    }

    #[test]
    fn send_while_not_open_is_rejected() {
        let (handle, _rx, _state) = detached_handle(ConnectionState::Connecting, 4);

        let err = handle.send(move_to(1, 1)).expect_err("not open");
        assert!(matches!(
            err,
            TransportError::NotOpen {
                state: ConnectionState::Connecting
            }
        ));
        assert!(err.is_unavailable());
    }

    #[test]
    fn send_queues_encoded_frame() {
        let (handle, mut rx, _state) = detached_handle(ConnectionState::Open, 4);

        handle.send(move_to(5, 10)).expect("send");

        let text = rx.try_recv().expect("queued frame");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["action"], "player_move");
        assert_eq!(value["new_pos"]["x"], 5);
        assert_eq!(value["new_pos"]["y"], 10);
    }

    #[test]
    fn full_queue_and_dead_writer_are_reported() {
        let (handle, rx, _state) = detached_handle(ConnectionState::Open, 1);

        handle.send(move_to(0, 1)).expect("first send");
        assert!(matches!(
            handle.send(move_to(0, 2)),
            Err(TransportError::QueueFull)
        ));

        drop(rx);
        assert!(matches!(
            handle.send(move_to(0, 3)),
            Err(TransportError::WriterGone)
        ));
    }

    #[test]
    fn state_changes_are_visible_through_the_handle() {
        let (handle, _rx, state) = detached_handle(ConnectionState::Open, 1);
        assert!(OutboundPort::is_open(&handle));

        state.send_replace(ConnectionState::Closed);
        assert!(!OutboundPort::is_open(&handle));
        assert!(matches!(
            handle.send(move_to(0, 0)),
            Err(TransportError::NotOpen {
                state: ConnectionState::Closed
            })
        ));
    }

    #[tokio::test]
    async fn failed_connect_leaves_errored_state() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let transport = Transport::new(format!("ws://{addr}"), 4);
        let states = transport.subscribe();
        assert_eq!(transport.state(), ConnectionState::Idle);

        let result = transport.connect().await;
        assert!(matches!(result, Err(TransportError::Connect { .. })));
        assert_eq!(*states.borrow(), ConnectionState::Errored);
    }

    #[tokio::test]
    async fn round_trip_against_local_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = tokio_tungstenite::accept_async(stream)
                .await
                .expect("handshake");
            ws.send(Message::Text(
                r#"{"type":"player_moved","player_pos":{"x":1,"y":1}}"#.to_string(),
            ))
            .await
            .expect("send moved");
            ws.send(Message::Text(r#"{"type":"game_message","text":"hi"}"#.to_string()))
                .await
                .expect("send notice");

            let frame = ws.next().await.expect("client frame").expect("frame ok");
            frame.into_text().expect("text frame")
        });

        let transport = Transport::new(format!("ws://{addr}"), 4);
        let mut states = transport.subscribe();
        let (handle, mut batches) = transport.connect().await.expect("connect");
        assert_eq!(handle.state(), ConnectionState::Open);

        let mut events = Vec::new();
        while events.len() < 2 {
            let batch = tokio::time::timeout(Duration::from_secs(5), batches.next_batch())
                .await
                .expect("batch in time")
                .expect("reader alive");
            events.extend(batch);
        }
        assert_eq!(
            events,
            vec![
                GameEvent::PlayerMoved {
                    player_pos: Some(Position::new(1, 1))
                },
                GameEvent::ServerNotice {
                    text: Some("hi".to_string())
                },
            ]
        );

        handle.send(move_to(2, 1)).expect("send move");
        let received = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server in time")
            .expect("server task");
        let value: serde_json::Value = serde_json::from_str(&received).expect("json");
        assert_eq!(value["action"], "player_move");

        handle.close();
        let terminal = tokio::time::timeout(
            Duration::from_secs(5),
            states.wait_for(|s| s.is_terminal()),
        )
        .await
        .expect("terminal state in time")
        .map(|s| *s);
        assert!(matches!(
            terminal,
            Ok(ConnectionState::Closed) | Ok(ConnectionState::Errored)
        ));
    }
}
