use crate::domain::entity::EntityKind;
use crate::domain::geometry::Vector2D;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub kind: EntityKind,
    pub position: Vector2D,
}

/// Spawn policy for enemies: where they appear, how fast they return, how many at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnPolicy {
    pub points: Vec<SpawnPoint>,

    /// Ticks a point stays empty after its occupant is removed.
    pub respawn_ticks: u32,

    /// Upper bound on enemies alive at once.
    pub max_alive: usize,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        let point = |kind, x, y| SpawnPoint {
            kind,
            position: Vector2D::new(x, y),
        };
        Self {
            points: vec![
                point(EntityKind::Monster, 10.0, 3.0),
                point(EntityKind::Monster, 14.0, 8.0),
                point(EntityKind::Monster, 5.0, 11.0),
                point(EntityKind::Dragon, 19.0, 12.0),
            ],
            respawn_ticks: 600,
            max_alive: 6,
        }
    }
}
