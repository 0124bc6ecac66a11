//! Session driver
//!
//! One task owns the `WorldState`. It selects over inbound batches, commands
//! from the input side, the notice-expiry timer and connection-state changes,
//! folds everything through the reducer and publishes an immutable snapshot
//! after each step. A batch is fully folded and published before the next
//! select iteration, so commands always act on the latest applied batch.

use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::Sleep;

use dungeonsync_domain::{GameMessage, WorldState};

use crate::application::dispatcher::ActionDispatcher;
use crate::application::events::GameEvent;
use crate::application::input::{map_key, random_seed, resolve_seed, Intent, KeyPress};
use crate::application::reducer::apply_batch;
use crate::config::ClientConfig;
use crate::infrastructure::websocket::{ConnectionState, FrameBatcher};

/// Commands accepted by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// A raw key press, mapped against the current snapshot
    Key(KeyPress),
    /// An already-resolved intent (e.g. from a click)
    Act(Intent),
    /// New game with a player-typed seed; non-numeric text means random
    NewGame { seed_text: String },
    /// Explicit dungeon request, e.g. after taking the stairs
    RequestDungeon { seed: i64, is_level_transition: bool },
    Shutdown,
}

#[derive(Debug, Error)]
#[error("Session driver has stopped")]
pub struct SessionStopped;

/// Cloneable handle for renderers and input sources.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<Arc<WorldState>>,
}

impl SessionHandle {
    pub async fn send(&self, command: SessionCommand) -> Result<(), SessionStopped> {
        self.commands.send(command).await.map_err(|_| SessionStopped)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<WorldState> {
        Arc::clone(&self.snapshots.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<WorldState>> {
        self.snapshots.clone()
    }
}

struct PendingExpiry {
    revision: u64,
    sleep: Pin<Box<Sleep>>,
}

pub struct SessionDriver {
    state: WorldState,
    dispatcher: ActionDispatcher,
    commands: mpsc::Receiver<SessionCommand>,
    snapshots: watch::Sender<Arc<WorldState>>,
    connection: watch::Receiver<ConnectionState>,
    connection_live: bool,
    batches: Option<FrameBatcher>,
    seed: Option<i64>,
    initial_requested: bool,
    scheduled_revision: u64,
    expiry: Option<PendingExpiry>,
}

impl SessionDriver {
    pub fn new(
        dispatcher: ActionDispatcher,
        connection: watch::Receiver<ConnectionState>,
        batches: FrameBatcher,
        config: &ClientConfig,
    ) -> (Self, SessionHandle) {
        let state = WorldState::default();
        let (commands_tx, commands_rx) = mpsc::channel(config.command_capacity.max(1));
        let (snapshots_tx, snapshots_rx) = watch::channel(Arc::new(state.clone()));

        let driver = Self {
            scheduled_revision: state.message_revision,
            state,
            dispatcher,
            commands: commands_rx,
            snapshots: snapshots_tx,
            connection,
            connection_live: true,
            batches: Some(batches),
            seed: config.seed,
            initial_requested: false,
            expiry: None,
        };
        let handle = SessionHandle {
            commands: commands_tx,
            snapshots: snapshots_rx,
        };
        (driver, handle)
    }

    /// Run until `Shutdown` or every handle is dropped. Returns the final state.
    pub async fn run(mut self) -> WorldState {
        let initial = *self.connection.borrow_and_update();
        self.on_connection(initial);

        loop {
            tokio::select! {
                batch = next_batch(&mut self.batches), if self.batches.is_some() => {
                    match batch {
                        Some(events) => self.fold(events),
                        None => {
                            tracing::info!("Inbound stream ended");
                            self.batches = None;
                        }
                    }
                }
                command = self.commands.recv() => {
                    match command {
                        Some(SessionCommand::Shutdown) | None => break,
                        Some(command) => self.execute(command),
                    }
                }
                changed = self.connection.changed(), if self.connection_live => {
                    if changed.is_err() {
                        self.connection_live = false;
                        continue;
                    }
                    let state = *self.connection.borrow_and_update();
                    self.on_connection(state);
                }
                revision = expiry_due(&mut self.expiry) => {
                    self.expiry = None;
                    self.fold(vec![GameEvent::NoticeExpired { revision }]);
                }
            }
        }

        tracing::info!("Session driver stopped");
        self.state
    }

    fn is_connected(&self) -> bool {
        self.dispatcher.is_connected()
    }

    fn on_connection(&mut self, state: ConnectionState) {
        match state {
            ConnectionState::Open if !self.initial_requested => {
                self.initial_requested = true;
                let seed = self.seed.unwrap_or_else(random_seed);
                tracing::info!(seed, "Connected, requesting initial dungeon");
                let events = self.dispatcher.request_dungeon(seed, false);
                self.fold(events);
            }
            ConnectionState::Errored => {
                self.fold(vec![
                    GameEvent::LoadingChanged { loading: false },
                    GameEvent::notice(GameMessage::error(
                        "Error: Cannot connect to server.",
                        GameMessage::PERSISTENT,
                    )),
                ]);
            }
            ConnectionState::Closed => {
                self.fold(vec![
                    GameEvent::LoadingChanged { loading: false },
                    GameEvent::notice(GameMessage::error(
                        "Error: Connection to server closed.",
                        GameMessage::PERSISTENT,
                    )),
                ]);
            }
            _ => {}
        }
    }

    fn execute(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Key(press) => {
                match map_key(&self.state, self.is_connected(), press) {
                    Some(intent) => self.perform(intent),
                    None => tracing::trace!(?press, "Key ignored"),
                }
            }
            SessionCommand::Act(intent) => self.perform(intent),
            SessionCommand::NewGame { seed_text } => self.new_game(resolve_seed(&seed_text)),
            SessionCommand::RequestDungeon {
                seed,
                is_level_transition,
            } => {
                let events = self.dispatcher.request_dungeon(seed, is_level_transition);
                self.fold(events);
            }
            SessionCommand::Shutdown => {}
        }
    }

    fn perform(&mut self, intent: Intent) {
        let events = match intent {
            Intent::NewGame => {
                self.new_game(self.seed.unwrap_or_else(random_seed));
                return;
            }
            Intent::Move(target) => self.dispatcher.attempt_move(&self.state, target),
            Intent::Select(index) => self.dispatcher.select_inventory(Some(index)),
            Intent::UseItem(id) => self.dispatcher.use_item(&self.state, Some(id)),
            Intent::EquipItem(id) => self.dispatcher.equip_item(&self.state, Some(id)),
            Intent::Unequip(slot) => self.dispatcher.unequip_item(&self.state, slot),
        };
        self.fold(events);
    }

    /// Overlapping generation requests are dropped while a load is pending.
    fn new_game(&mut self, seed: i64) {
        if self.state.loading && !self.state.is_game_over {
            tracing::debug!(seed, "Dungeon request already pending, ignoring new game");
            return;
        }
        self.initial_requested = true;
        let events = self.dispatcher.request_dungeon(seed, false);
        self.fold(events);
    }

    fn fold(&mut self, events: Vec<GameEvent>) {
        if events.is_empty() {
            return;
        }
        let local = events.iter().filter(|e| e.is_local()).count();
        tracing::debug!(count = events.len(), local, "Applying events");

        let state = std::mem::take(&mut self.state);
        self.state = apply_batch(state, events);

        self.reschedule_expiry();
        self.snapshots.send_replace(Arc::new(self.state.clone()));
    }

    /// A new notice cancels the pending timer; timed notices get a new one.
    fn reschedule_expiry(&mut self) {
        let revision = self.state.message_revision;
        if revision == self.scheduled_revision {
            return;
        }
        self.scheduled_revision = revision;
        self.expiry = None;

        let message = &self.state.game_message;
        if message.is_empty() || message.is_persistent() {
            return;
        }
        self.expiry = Some(PendingExpiry {
            revision,
            sleep: Box::pin(tokio::time::sleep(Duration::from_millis(message.duration_ms))),
        });
    }
}

async fn next_batch(batches: &mut Option<FrameBatcher>) -> Option<Vec<GameEvent>> {
    match batches {
        Some(batches) => batches.next_batch().await,
        None => pending().await,
    }
}

async fn expiry_due(expiry: &mut Option<PendingExpiry>) -> u64 {
    match expiry {
        Some(pending_expiry) => {
            pending_expiry.sleep.as_mut().await;
            pending_expiry.revision
        }
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use dungeonsync_domain::Position;
    use dungeonsync_shared::{decode_server_frame, ClientMessage};
    use url::Url;

    use crate::application::input::Key;
    use crate::infrastructure::message_translator::InboundFrame;
    use crate::ports::outbound::MockOutboundPort;

    const DUNGEON: &str = r#"{
        "type": "dungeon_data",
        "map": [[2,2,2,2],[2,1,1,2],[2,1,1,2],[2,2,2,2]],
        "player_start_pos": {"x": 1, "y": 1},
        "monsters": [{"id": "m1", "type": "goblin", "x": 2, "y": 2, "tile_id": 4}],
        "seed_used": 7,
        "current_dungeon_level": 1
    }"#;

    struct Harness {
        handle: SessionHandle,
        frames: mpsc::UnboundedSender<InboundFrame>,
        connection: watch::Sender<ConnectionState>,
        sent: Arc<Mutex<Vec<ClientMessage>>>,
        task: tokio::task::JoinHandle<WorldState>,
    }

    impl Harness {
        fn start(initial: ConnectionState, seed: Option<i64>) -> Self {
            let sent = Arc::new(Mutex::new(Vec::new()));
            let mut port = MockOutboundPort::new();
            let recorded = Arc::clone(&sent);
            port.expect_send().returning(move |message| {
                recorded.lock().expect("lock").push(message);
                Ok(())
            });
            port.expect_is_open().return_const(true);

            let (connection, connection_rx) = watch::channel(initial);
            let (frames, frames_rx) = mpsc::unbounded_channel();
            let config = ClientConfig {
                ws_url: Url::parse(ClientConfig::DEFAULT_WS_URL).expect("url"),
                seed,
                command_capacity: 8,
            };
            let (driver, handle) = SessionDriver::new(
                ActionDispatcher::new(Arc::new(port)),
                connection_rx,
                FrameBatcher::new(frames_rx),
                &config,
            );
            let task = tokio::spawn(driver.run());

            Self {
                handle,
                frames,
                connection,
                sent,
                task,
            }
        }

        fn push(&self, frame: &str) {
            self.frames.send(decode_server_frame(frame)).expect("driver alive");
        }

        async fn wait_for(
            &self,
            predicate: impl FnMut(&Arc<WorldState>) -> bool,
        ) -> Arc<WorldState> {
            let mut snapshots = self.handle.subscribe();
            let snapshot = snapshots.wait_for(predicate).await.expect("driver alive");
            Arc::clone(&snapshot)
        }

        fn sent(&self) -> Vec<ClientMessage> {
            self.sent.lock().expect("lock").clone()
        }

        async fn stop(self) -> WorldState {
            self.handle
                .send(SessionCommand::Shutdown)
                .await
                .expect("send shutdown");
            self.task.await.expect("driver task")
        }

        async fn stop_and_sent(self) -> Vec<ClientMessage> {
            let sent = Arc::clone(&self.sent);
            self.stop().await;
            let sent = sent.lock().expect("lock").clone();
            sent
        }
    }

    #[tokio::test]
    async fn open_connection_requests_initial_dungeon() {
        let harness = Harness::start(ConnectionState::Open, Some(7));

        let snapshot = harness
            .wait_for(|s| s.game_message.text.starts_with("Requesting"))
            .await;
        assert!(snapshot.loading);
        assert_eq!(snapshot.game_message.text, "Requesting dungeon (Seed: 7)...");
        assert_eq!(
            harness.sent(),
            vec![ClientMessage::GenerateDungeon { seed: Some(7) }]
        );

        harness.stop().await;
    }

    #[tokio::test]
    async fn initial_request_waits_for_open() {
        let harness = Harness::start(ConnectionState::Connecting, Some(3));
        tokio::task::yield_now().await;
        assert!(harness.sent().is_empty());

        harness.connection.send_replace(ConnectionState::Open);
        harness.wait_for(|s| s.loading && !s.game_message.is_empty()).await;
        assert_eq!(
            harness.sent(),
            vec![ClientMessage::GenerateDungeon { seed: Some(3) }]
        );

        harness.stop().await;
    }

    #[tokio::test]
    async fn batches_are_folded_and_published() {
        let harness = Harness::start(ConnectionState::Connecting, None);

        harness.push(DUNGEON);
        harness.push(r#"{"type":"monster_moved","monster_id":"m1","new_pos":{"x":1,"y":2}}"#);

        let snapshot = harness.wait_for(|s| s.map.is_some()).await;
        assert!(!snapshot.loading);
        assert_eq!(snapshot.player_pos, Some(Position::new(1, 1)));
        let final_state = harness.stop().await;
        assert_eq!(
            final_state.monsters[0].position(),
            Position::new(1, 2)
        );
    }

    #[tokio::test]
    async fn errored_connection_raises_persistent_error() {
        let harness = Harness::start(ConnectionState::Connecting, None);

        harness.connection.send_replace(ConnectionState::Errored);
        let snapshot = harness.wait_for(|s| s.game_message.is_error).await;

        assert!(!snapshot.loading);
        assert_eq!(snapshot.game_message.text, "Error: Cannot connect to server.");
        assert!(snapshot.game_message.is_persistent());

        harness.stop().await;
    }

    #[tokio::test]
    async fn key_press_moves_through_dispatcher() {
        let harness = Harness::start(ConnectionState::Open, Some(7));
        harness.push(DUNGEON);
        harness.wait_for(|s| s.map.is_some()).await;

        harness
            .handle
            .send(SessionCommand::Key(KeyPress::plain(Key::Right)))
            .await
            .expect("send key");

        let sent = harness.stop_and_sent().await;
        assert_eq!(
            sent.last(),
            Some(&ClientMessage::PlayerMove {
                new_pos: Position::new(2, 1)
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timed_notice_expires_and_stale_timer_is_cancelled() {
        let harness = Harness::start(ConnectionState::Connecting, None);

        harness.push(r#"{"type":"game_message","text":"first"}"#);
        harness.wait_for(|s| s.game_message.text == "first").await;

        tokio::time::advance(Duration::from_millis(1000)).await;
        harness.push(r#"{"type":"game_message","text":"second"}"#);
        harness.wait_for(|s| s.game_message.text == "second").await;

        // Past the first notice's deadline, before the second's
        tokio::time::advance(Duration::from_millis(2500)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert_eq!(harness.handle.snapshot().game_message.text, "second");

        let cleared = harness.wait_for(|s| s.game_message.is_empty()).await;
        assert!(!cleared.game_message.is_error);

        harness.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_notice_never_expires() {
        let harness = Harness::start(ConnectionState::Connecting, None);

        harness.push(r#"{"type":"error","message":"boom"}"#);
        harness.wait_for(|s| s.game_message.is_error).await;

        tokio::time::advance(Duration::from_secs(60)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert_eq!(harness.handle.snapshot().game_message.text, "Error: boom");

        harness.stop().await;
    }

    #[tokio::test]
    async fn frames_interleaved_with_commands_are_all_applied() {
        let harness = Harness::start(ConnectionState::Connecting, None);

        for i in 0..40 {
            harness.push(&format!(r#"{{"type":"error","message":"n{i}"}}"#));
            harness
                .handle
                .send(SessionCommand::Key(KeyPress::plain(Key::Enter)))
                .await
                .expect("send key");
        }

        let snapshot = tokio::time::timeout(
            Duration::from_secs(5),
            harness.wait_for(|s| s.game_message.text == "Error: n39"),
        )
        .await
        .expect("last frame applied");
        assert_eq!(snapshot.message_revision, 40);

        harness.stop().await;
    }

    #[tokio::test]
    async fn new_game_is_ignored_while_loading() {
        let harness = Harness::start(ConnectionState::Open, Some(7));
        harness.wait_for(|s| s.loading && !s.game_message.is_empty()).await;

        harness
            .handle
            .send(SessionCommand::NewGame {
                seed_text: "99".to_string(),
            })
            .await
            .expect("send new game");
        let sent = harness.stop_and_sent().await;
        assert_eq!(sent, vec![ClientMessage::GenerateDungeon { seed: Some(7) }]);
    }
}
