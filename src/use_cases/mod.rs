// Use cases layer: the game loop driver and its clock.

pub mod game;
pub mod timer;
pub mod types;

pub use game::{GameError, GameHandle, GameSettings, start_game};
pub use timer::{TickAccumulator, Timer, TimerError, TimerHandle};
pub use types::{GameEvent, GamePhase, WorldUpdate};
