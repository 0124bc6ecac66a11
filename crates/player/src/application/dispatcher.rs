//! Action dispatcher
//!
//! Turns player intents into outbound requests plus the local events that
//! describe their optimistic effect. Every network send in the client goes
//! through here. Nothing is applied directly: the caller folds the returned
//! events through the reducer like any server batch.

use std::sync::Arc;

use dungeonsync_domain::{EquipmentSlot, GameMessage, ItemId, Position, WorldState};
use dungeonsync_shared::ClientMessage;

use crate::application::events::GameEvent;
use crate::ports::outbound::OutboundPort;

pub struct ActionDispatcher {
    port: Arc<dyn OutboundPort>,
}

impl ActionDispatcher {
    pub fn new(port: Arc<dyn OutboundPort>) -> Self {
        Self { port }
    }

    pub fn is_connected(&self) -> bool {
        self.port.is_open()
    }

    /// Ask the server for a dungeon.
    ///
    /// A level transition keeps the current world visible (no loading gate).
    pub fn request_dungeon(&self, seed: i64, is_level_transition: bool) -> Vec<GameEvent> {
        let mut events = Vec::with_capacity(4);
        if !is_level_transition {
            events.push(GameEvent::LoadingChanged { loading: true });
        }
        events.push(GameEvent::notice(GameMessage::info(
            format!("Requesting dungeon (Seed: {seed})..."),
            GameMessage::PERSISTENT,
        )));

        if let Err(e) = self.port.send(ClientMessage::GenerateDungeon { seed: Some(seed) }) {
            tracing::error!(error = %e, seed, "Failed to request dungeon");
            events.push(GameEvent::LoadingChanged { loading: false });
            events.push(persistent_error(if e.is_unavailable() {
                "Error: Cannot connect to server."
            } else {
                "Error: Cannot send dungeon request to server."
            }));
        }
        events
    }

    /// Ask to move. Position only changes when the server answers.
    pub fn attempt_move(&self, state: &WorldState, target: Position) -> Vec<GameEvent> {
        if state.is_game_over {
            return vec![persistent_error("Game Over. Generate a new dungeon.")];
        }
        self.send_or_report(ClientMessage::PlayerMove { new_pos: target }, "move")
    }

    pub fn use_item(&self, state: &WorldState, item_id: Option<ItemId>) -> Vec<GameEvent> {
        if state.is_game_over {
            return vec![persistent_error("Game Over. Cannot use items.")];
        }
        let Some(item_id) = item_id else {
            return vec![short_error("No item selected to use.")];
        };
        self.send_clearing_selection(ClientMessage::UseItem { item_id }, "'use item' action")
    }

    pub fn equip_item(&self, state: &WorldState, item_id: Option<ItemId>) -> Vec<GameEvent> {
        if state.is_game_over {
            return vec![persistent_error("Game Over. Cannot equip items.")];
        }
        let Some(item_id) = item_id else {
            return vec![short_error("No item selected to equip.")];
        };
        self.send_clearing_selection(ClientMessage::EquipItem { item_id }, "'equip item' action")
    }

    pub fn unequip_item(&self, state: &WorldState, slot: EquipmentSlot) -> Vec<GameEvent> {
        if state.is_game_over {
            return vec![persistent_error("Game Over. Cannot unequip items.")];
        }
        if !state.equipment().is_occupied(slot) {
            return vec![short_error(format!("Nothing equipped in {slot} slot."))];
        }
        self.send_or_report(ClientMessage::UnequipItem { slot }, "'unequip item' action")
    }

    /// Local only; nothing is sent.
    pub fn select_inventory(&self, index: Option<usize>) -> Vec<GameEvent> {
        vec![GameEvent::InventorySelected { index }]
    }

    fn send_clearing_selection(&self, message: ClientMessage, what: &str) -> Vec<GameEvent> {
        let mut events = self.send_or_report(message, what);
        if events.is_empty() {
            events.push(GameEvent::InventorySelected { index: None });
        }
        events
    }

    /// Empty on success, otherwise the persistent error to show.
    fn send_or_report(&self, message: ClientMessage, what: &str) -> Vec<GameEvent> {
        let action = message.action();
        match self.port.send(message) {
            Ok(()) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, action, "Failed to send action");
                vec![persistent_error(format!("Error: Cannot send {what} to server."))]
            }
        }
    }
}

fn persistent_error(text: impl Into<String>) -> GameEvent {
    GameEvent::notice(GameMessage::error(text, GameMessage::PERSISTENT))
}

fn short_error(text: impl Into<String>) -> GameEvent {
    GameEvent::notice(GameMessage::error(text, GameMessage::INFO_MS))
}
