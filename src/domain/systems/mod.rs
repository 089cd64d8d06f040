// Per-tick systems operating on entities: AI decisions and collision.

pub mod ai;
pub mod collision;

pub use ai::{Command, decide};
pub use collision::{Body, DamageEvent, EPSILON, MoveOutcome, resolve_attack, resolve_motion};
