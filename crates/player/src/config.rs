//! Client configuration

use std::env;

use anyhow::{bail, Context, Result};
use url::Url;

/// Client configuration loaded from environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Dungeon server websocket endpoint (plain ws://; no TLS support)
    pub ws_url: Url,
    /// Seed for the first dungeon; random when unset
    pub seed: Option<i64>,
    /// Capacity of the command and outbound queues
    pub command_capacity: usize,
}

impl ClientConfig {
    pub const DEFAULT_WS_URL: &'static str = "ws://localhost:8000/ws/dungeon";
    pub const DEFAULT_COMMAND_CAPACITY: usize = 32;

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_url = lookup("DUNGEON_WS_URL").unwrap_or_else(|| Self::DEFAULT_WS_URL.to_string());
        let ws_url = Url::parse(raw_url.trim())
            .with_context(|| format!("DUNGEON_WS_URL is not a valid URL: {raw_url}"))?;
        match ws_url.scheme() {
            "ws" => {}
            "wss" => bail!("DUNGEON_WS_URL uses wss://, but this build has no TLS support"),
            other => bail!("DUNGEON_WS_URL must use ws://, got {other}://"),
        }

        let seed = match lookup("DUNGEON_SEED").filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .with_context(|| format!("DUNGEON_SEED must be an integer, got {raw}"))?,
            ),
            None => None,
        };

        let command_capacity = lookup("DUNGEON_BATCH_CHANNEL")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(Self::DEFAULT_COMMAND_CAPACITY);

        Ok(Self {
            ws_url,
            seed,
            command_capacity,
        })
    }
}

/// Load `.env.local` then `.env` from the repository root, if present.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
