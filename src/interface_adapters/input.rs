// Keyboard-style input collaborator: tracks held keys, reports movement intent.

use crate::domain::{InputSource, Key, Vector2D};
use std::collections::HashSet;

/// Set of currently held keys.
///
/// Opposite directions cancel out. Attack is edge-triggered: holding the key
/// requests one attack, and a new press is needed for the next.
#[derive(Debug, Clone, Default)]
pub struct KeyStack {
    pressed: HashSet<Key>,
    attack_pending: bool,
}

impl KeyStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

impl InputSource for KeyStack {
    fn key_down(&mut self, key: Key) {
        let newly_pressed = self.pressed.insert(key);
        if key == Key::Attack && newly_pressed {
            self.attack_pending = true;
        }
    }

    fn key_up(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    fn current_movement_vector(&self) -> Vector2D {
        // Fixed order keeps float sums identical regardless of set iteration order.
        [Key::Up, Key::Down, Key::Left, Key::Right]
            .into_iter()
            .filter(|key| self.is_pressed(*key))
            .filter_map(Key::direction)
            .fold(Vector2D::ZERO, |sum, dir| sum + dir)
            .normalized()
    }

    fn attack_requested(&mut self) -> bool {
        std::mem::take(&mut self.attack_pending)
    }
}
