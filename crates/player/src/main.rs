//! dungeonsync Player - terminal composition root binary.
//!
//! Reads one key per line from stdin (`w`, `W`, `up`, `3`, `u`, ...).
//! `new <seed>` starts a new game and `quit` exits.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dungeonsync_domain::WorldState;
use dungeonsync_player::config::load_dotenv_from_repo_root;
use dungeonsync_player::{
    ActionDispatcher, ClientConfig, KeyPress, SessionCommand, SessionDriver, SessionHandle,
    Transport,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dungeonsync_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting dungeonsync Player");

    let config = ClientConfig::from_env().context("Invalid client configuration")?;

    let transport = Transport::new(config.ws_url.as_str(), config.command_capacity);
    let connection = transport.subscribe();
    let (handle, batches) = transport
        .connect()
        .await
        .with_context(|| format!("Could not reach dungeon server at {}", config.ws_url))?;

    let dispatcher = ActionDispatcher::new(Arc::new(handle.clone()));
    let (driver, session) = SessionDriver::new(dispatcher, connection, batches, &config);
    let driver_task = tokio::spawn(driver.run());

    tokio::spawn(log_snapshots(session.clone()));

    read_input(&session).await?;

    handle.close();
    let final_state = driver_task.await.context("Session driver panicked")?;
    tracing::info!(
        level = final_state.current_dungeon_level,
        game_over = final_state.is_game_over,
        "Session ended"
    );
    Ok(())
}

async fn read_input(session: &SessionHandle) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let command = if line.eq_ignore_ascii_case("quit") {
            SessionCommand::Shutdown
        } else if let Some(seed_text) = line.strip_prefix("new") {
            SessionCommand::NewGame {
                seed_text: seed_text.trim().to_string(),
            }
        } else if let Some(press) = KeyPress::parse(line) {
            SessionCommand::Key(press)
        } else {
            tracing::warn!(input = line, "Unrecognized input");
            continue;
        };

        let stop = command == SessionCommand::Shutdown;
        if session.send(command).await.is_err() || stop {
            break;
        }
    }

    // stdin closed
    let _ = session.send(SessionCommand::Shutdown).await;
    Ok(())
}

/// Stand-in renderer: logs each notice and position change.
async fn log_snapshots(session: SessionHandle) {
    let mut snapshots = session.subscribe();
    let mut last: Arc<WorldState> = session.snapshot();

    while snapshots.changed().await.is_ok() {
        let current = Arc::clone(&snapshots.borrow_and_update());

        if current.message_revision != last.message_revision && !current.game_message.is_empty() {
            if current.game_message.is_error {
                tracing::warn!("{}", current.game_message.text);
            } else {
                tracing::info!("{}", current.game_message.text);
            }
        }
        if current.player_pos != last.player_pos {
            if let Some(pos) = current.player_pos {
                tracing::info!(
                    position = %pos,
                    hp = current.player_stats.hp,
                    max_hp = current.player_stats.max_hp,
                    monsters = current.monsters.len(),
                    "Player position"
                );
            }
        }
        last = current;
    }
}
