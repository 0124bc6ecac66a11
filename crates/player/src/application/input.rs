//! Keyboard mapping
//!
//! Translates key presses into [`Intent`]s against the current snapshot. The
//! session driver executes intents through the dispatcher; nothing here
//! touches the network.

use rand::Rng;

use dungeonsync_domain::{EquipmentSlot, ItemId, Position, WorldState};

/// Upper bound (exclusive) for generated seeds.
pub const RANDOM_SEED_RANGE: i64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }

    /// Parse a line of terminal input (`w`, `W`, `3`, `up`, `enter`, ...).
    ///
    /// An uppercase letter counts as Shift plus that letter.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.to_ascii_lowercase().as_str() {
            "" | "enter" => return Some(Self::plain(Key::Enter)),
            "up" => return Some(Self::plain(Key::Up)),
            "down" => return Some(Self::plain(Key::Down)),
            "left" => return Some(Self::plain(Key::Left)),
            "right" => return Some(Self::plain(Key::Right)),
            _ => {}
        }

        let mut chars = text.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        Some(Self {
            key: Key::Char(c.to_ascii_lowercase()),
            shift: c.is_ascii_uppercase(),
        })
    }
}

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    NewGame,
    Move(Position),
    Select(usize),
    UseItem(ItemId),
    EquipItem(ItemId),
    Unequip(EquipmentSlot),
}

/// Map a key press to an intent, or `None` when it is ignored.
pub fn map_key(state: &WorldState, connected: bool, press: KeyPress) -> Option<Intent> {
    let key = match press.key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    };

    if state.is_game_over {
        return matches!(key, Key::Enter | Key::Char('r')).then_some(Intent::NewGame);
    }
    if state.loading || !connected {
        return None;
    }

    let inventory = state.inventory();

    if let Key::Char(digit @ '1'..='9') = key {
        let index = (digit as usize) - ('1' as usize);
        if index < inventory.len() {
            return Some(Intent::Select(index));
        }
    }

    if key == Key::Char('u') {
        if let Some(item) = state.selected_item() {
            return Some(Intent::UseItem(item.id.clone()));
        }
        if !inventory.is_empty() {
            return Some(match state.player_stats.first_consumable() {
                Some(item) => Intent::UseItem(item.id.clone()),
                None => Intent::Select(0),
            });
        }
    }

    if key == Key::Char('e') {
        if let Some(item) = state.selected_item() {
            return item.equippable.then(|| Intent::EquipItem(item.id.clone()));
        }
        if !inventory.is_empty() {
            return Some(match state.player_stats.first_equippable() {
                Some(item) => Intent::EquipItem(item.id.clone()),
                None => Intent::Select(0),
            });
        }
    }

    if press.shift {
        let slot = match key {
            Key::Char('w') => Some(EquipmentSlot::Weapon),
            Key::Char('a') => Some(EquipmentSlot::Armor),
            _ => None,
        };
        if let Some(slot) = slot.filter(|slot| state.equipment().is_occupied(*slot)) {
            return Some(Intent::Unequip(slot));
        }
    }

    let (Some(_), Some(pos)) = (state.map.as_ref(), state.player_pos) else {
        return None;
    };
    let target = match key {
        Key::Up | Key::Char('w') => pos.offset(0, -1),
        Key::Down | Key::Char('s') => pos.offset(0, 1),
        Key::Left | Key::Char('a') => pos.offset(-1, 0),
        Key::Right | Key::Char('d') => pos.offset(1, 0),
        _ => return None,
    };
    Some(Intent::Move(target))
}

/// Seed typed by the player, if it is a number.
pub fn parse_seed(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

pub fn random_seed() -> i64 {
    rand::thread_rng().gen_range(0..RANDOM_SEED_RANGE)
}

/// Seed typed by the player, or a random one when the text is empty or not
/// a number.
pub fn resolve_seed(text: &str) -> i64 {
    parse_seed(text).unwrap_or_else(random_seed)
}
