use std::collections::HashSet;

use glam::Vec2;
use parking_lot::RwLock;

/// Non-character keys the simulation reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    LeftShift,
    RightShift,
}

/// A key in the held-key set.
///
/// Character keys are stored uppercased so bindings read like key caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
}

/// Snapshot of keyboard and cursor state, polled once per frame.
///
/// The window event loop writes into this between frames through a shared
/// reference, hence the interior mutability.
#[derive(Debug, Default)]
pub struct InputState {
    keys: RwLock<HashSet<KeyCode>>,
    cursor: RwLock<Option<Vec2>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&self, key: KeyCode) {
        self.keys.write().insert(key);
    }

    pub fn set_key_up(&self, key: KeyCode) {
        self.keys.write().remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.read().contains(&key)
    }

    /// True while either shift key is held.
    pub fn shift_down(&self) -> bool {
        let keys = self.keys.read();
        keys.contains(&KeyCode::Named(NamedKey::LeftShift))
            || keys.contains(&KeyCode::Named(NamedKey::RightShift))
    }

    pub fn set_cursor_position(&self, position: Vec2) {
        *self.cursor.write() = Some(position);
    }

    /// Last reported cursor position, if the window has seen one yet.
    pub fn cursor_position(&self) -> Option<Vec2> {
        *self.cursor.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_held_keys() {
        let input = InputState::new();
        assert!(!input.is_key_down(KeyCode::Character('W')));
        input.set_key_down(KeyCode::Character('W'));
        assert!(input.is_key_down(KeyCode::Character('W')));
        input.set_key_up(KeyCode::Character('W'));
        assert!(!input.is_key_down(KeyCode::Character('W')));
    }

    #[test]
    fn either_shift_counts() {
        let input = InputState::new();
        assert!(!input.shift_down());
        input.set_key_down(KeyCode::Named(NamedKey::LeftShift));
        assert!(input.shift_down());
        input.set_key_up(KeyCode::Named(NamedKey::LeftShift));
        input.set_key_down(KeyCode::Named(NamedKey::RightShift));
        assert!(input.shift_down());
    }

    #[test]
    fn cursor_is_unset_until_reported() {
        let input = InputState::new();
        assert_eq!(input.cursor_position(), None);
        input.set_cursor_position(Vec2::new(500.0, 1000.0));
        assert_eq!(input.cursor_position(), Some(Vec2::new(500.0, 1000.0)));
    }
}
