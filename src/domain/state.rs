// Domain-level snapshot and input types handed across the simulation boundary.

use super::entity::{Entity, EntityId, EntityKind, EntityState, Facing};
use super::geometry::{Range, Vector2D};

/// Read-only view of one entity for the render side.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vector2D,
    pub size: Vector2D,
    pub facing: Facing,
    pub state: EntityState,
    pub animation_index: u16,
    pub health: i32,
    pub max_health: i32,
}

impl From<&Entity> for EntitySnapshot {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id(),
            kind: e.kind(),
            position: e.position(),
            size: e.size(),
            facing: e.facing(),
            state: e.state(),
            animation_index: e.animation_index(),
            health: e.stats().health(),
            max_health: e.stats().max_health(),
        }
    }
}

/// Numbers shown by the HUD overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub health: i32,
    pub max_health: i32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub skill_points: u32,
    /// Live enemies.
    pub enemies: usize,
}

/// Everything the render context needs for one completed tick.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldUpdate {
    pub tick: u64,
    /// Player first, then enemies in insertion order.
    pub entities: Vec<EntitySnapshot>,
    pub camera: Range,
    pub hud: HudSnapshot,
}

/// Input state sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub movement: Vector2D,
    pub attack: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    /// The player died and its grace period ran out.
    GameOver,
}
