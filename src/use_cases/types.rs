// Use-case level inputs/outputs for the game loop.

use crate::domain::{Key, Stat};

pub use crate::domain::{GamePhase, WorldUpdate};

/// Events fed into the simulation from outside the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    KeyDown(Key),
    KeyUp(Key),
    SpendSkillPoint(Stat),
}
