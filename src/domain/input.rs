// Input collaborator port: whatever turns device events into per-tick intent.

use super::geometry::Vector2D;
use super::state::FrameInput;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Attack,
}

impl Key {
    /// Unit direction for movement keys.
    pub fn direction(self) -> Option<Vector2D> {
        match self {
            Key::Up => Some(Vector2D::new(0.0, -1.0)),
            Key::Down => Some(Vector2D::new(0.0, 1.0)),
            Key::Left => Some(Vector2D::new(-1.0, 0.0)),
            Key::Right => Some(Vector2D::new(1.0, 0.0)),
            Key::Attack => None,
        }
    }
}

pub trait InputSource: Send {
    fn key_down(&mut self, key: Key);

    fn key_up(&mut self, key: Key);

    /// Desired movement direction, length at most 1.
    fn current_movement_vector(&self) -> Vector2D;

    /// True once per attack press; reading it consumes the request.
    fn attack_requested(&mut self) -> bool;

    fn sample(&mut self) -> FrameInput {
        FrameInput {
            movement: self.current_movement_vector(),
            attack: self.attack_requested(),
        }
    }
}
