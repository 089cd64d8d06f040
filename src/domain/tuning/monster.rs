use super::CombatTuning;
use crate::domain::entity::{AiPolicy, AttackPattern, Behavior};
use serde::{Deserialize, Serialize};

/// Gameplay tuning for hostile kinds (regular monsters and the dragon boss).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterTuning {
    pub ai: AiPolicy,

    /// Center-to-center distance at which the monster starts chasing.
    pub aggro_radius: f64,

    /// Center-to-center distance at which the monster stops and attacks.
    pub attack_range: f64,

    /// Chance per tick to attack while in range and off cooldown (0.0..=1.0).
    pub attack_chance: f64,

    /// Experience granted to the player for the killing blow.
    pub xp_reward: u32,

    /// Fractional growth per player level above 1, applied at spawn to
    /// attack, defense, speed and xp reward.
    pub level_scaling: f64,

    pub combat: CombatTuning,
}

impl MonsterTuning {
    /// Boss defaults: slow, tough, area attack.
    pub fn dragon() -> Self {
        Self {
            ai: AiPolicy::Sentinel,
            aggro_radius: 6.0,
            attack_range: 2.2,
            attack_chance: 0.08,
            xp_reward: 400,
            level_scaling: 0.1,
            combat: CombatTuning {
                hitbox_width: 1.8,
                hitbox_height: 1.6,
                max_health: 500,
                attack: 4.0,
                defense: 2.0,
                move_speed: 2.0,
                attack_duration_ticks: 30,
                attack_cooldown_ticks: 90,
                hurt_stun_ticks: 6,
                attack_reach: 0.8,
                attack_pattern: AttackPattern::Sweep,
            },
        }
    }

    /// This tuning grown for a player at `level`.
    pub fn scaled(&self, level: u32) -> Self {
        let factor = 1.0 + self.level_scaling.max(0.0) * f64::from(level.saturating_sub(1));
        let mut scaled = self.clone();
        scaled.combat.attack *= factor;
        scaled.combat.defense *= factor;
        scaled.combat.move_speed *= factor;
        scaled.xp_reward = (f64::from(self.xp_reward) * factor).round() as u32;
        scaled
    }

    pub fn behavior(&self) -> Behavior {
        Behavior {
            ai: self.ai,
            pattern: self.combat.attack_pattern,
            reach: self.combat.attack_reach,
            aggro_radius: self.aggro_radius,
            attack_range: self.attack_range,
            attack_chance: self.attack_chance.clamp(0.0, 1.0),
            timings: self.combat.timings(),
            xp_reward: self.xp_reward,
        }
    }
}

impl Default for MonsterTuning {
    fn default() -> Self {
        Self {
            ai: AiPolicy::Hunter,
            aggro_radius: 8.0,
            attack_range: 1.2,
            attack_chance: 0.05,
            xp_reward: 150,
            level_scaling: 0.0,
            combat: CombatTuning {
                hitbox_width: 0.8,
                hitbox_height: 0.9,
                max_health: 100,
                attack: 1.0,
                defense: 1.0,
                move_speed: 3.0,
                attack_duration_ticks: 24,
                attack_cooldown_ticks: 60,
                hurt_stun_ticks: 12,
                attack_reach: 0.6,
                attack_pattern: AttackPattern::Strike,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dragon_grows_with_player_level() {
        let base = MonsterTuning::dragon();
        assert_eq!(base.scaled(1), base);

        let grown = base.scaled(5);
        assert!((grown.combat.attack - 5.6).abs() < 1e-9);
        assert!((grown.combat.defense - 2.8).abs() < 1e-9);
        assert!((grown.combat.move_speed - 2.8).abs() < 1e-9);
        assert_eq!(grown.xp_reward, 560);
        assert_eq!(grown.combat.max_health, base.combat.max_health);
    }

    #[test]
    fn regular_monsters_do_not_scale() {
        let base = MonsterTuning::default();
        assert_eq!(base.scaled(20), base);
    }
}
