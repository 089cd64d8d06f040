use super::CombatTuning;
use crate::domain::entity::{AiPolicy, AttackPattern, Behavior};
use crate::domain::geometry::Vector2D;
use serde::{Deserialize, Serialize};

/// Gameplay tuning for the player character.
///
/// Keep this separate from runtime configuration (tick rates, channel sizes, etc.).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Where the player appears when the world is built.
    pub spawn: Vector2D,

    pub combat: CombatTuning,
}

impl PlayerTuning {
    pub fn behavior(&self) -> Behavior {
        Behavior {
            ai: AiPolicy::Controlled,
            pattern: self.combat.attack_pattern,
            reach: self.combat.attack_reach,
            aggro_radius: 0.0,
            attack_range: 0.0,
            attack_chance: 0.0,
            timings: self.combat.timings(),
            xp_reward: 0,
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            spawn: Vector2D::new(2.0, 2.0),
            combat: CombatTuning {
                hitbox_width: 0.8,
                hitbox_height: 0.9,
                max_health: 100,
                attack: 1.0,
                defense: 1.0,
                move_speed: 5.0,
                attack_duration_ticks: 18,
                attack_cooldown_ticks: 24,
                hurt_stun_ticks: 12,
                attack_reach: 0.9,
                attack_pattern: AttackPattern::Strike,
            },
        }
    }
}
