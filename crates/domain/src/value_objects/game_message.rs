use serde::{Deserialize, Serialize};

/// The single user-visible notice slot.
///
/// `duration_ms == 0` means the notice stays until something replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameMessage {
    pub text: String,
    pub is_error: bool,
    pub duration_ms: u64,
}

impl GameMessage {
    pub const INFO_MS: u64 = 3_000;
    pub const DEATH_NOTICE_MS: u64 = 4_000;
    pub const MILESTONE_MS: u64 = 5_000;
    pub const PERSISTENT: u64 = 0;

    /// Informational notice that expires after `duration_ms`.
    pub fn info(text: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            duration_ms,
        }
    }

    /// Error notice that expires after `duration_ms` (0 = persistent).
    pub fn error(text: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            text: text.into(),
            is_error: true,
            duration_ms,
        }
    }

    /// The empty notice used when an expired message is cleared.
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_persistent(&self) -> bool {
        self.duration_ms == Self::PERSISTENT
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
