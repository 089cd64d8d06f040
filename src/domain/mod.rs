// Domain layer: core simulation types and rules.

pub mod camera;
pub mod enemies;
pub mod entity;
pub mod geometry;
pub mod input;
pub mod map;
pub mod state;
pub mod stats;
pub mod systems;
pub mod tuning;
pub mod world;

pub use camera::Camera;
pub use enemies::{Enemies, PLAYER_ID};
pub use entity::{
    AiPolicy, AttackPattern, Entity, EntityId, EntityKind, EntityState, Facing, animation_index,
};
pub use geometry::{Range, Vector2D};
pub use input::{InputSource, Key};
pub use map::{GridMap, MapError, TileMap};
pub use state::{EntitySnapshot, FrameInput, GamePhase, HudSnapshot, WorldUpdate};
pub use stats::{EntityStats, Progression, Stat, compute_damage};
pub use tuning::Tuning;
pub use world::{World, WorldSettings};
