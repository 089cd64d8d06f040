// Numeric attributes owned by entities, plus player progression.

use serde::{Deserialize, Serialize};

// Stat upgrade step sizes.
const UPGRADE_GAIN: f64 = 1.0;
const UPGRADE_LOSS: f64 = 0.25;

/// Stats a skill point can be spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Speed,
    Attack,
    Defense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    health: i32,
    max_health: i32,
    pub attack: f64,
    pub defense: f64,
    pub move_speed: f64,
}

impl EntityStats {
    /// Creates stats at full health.
    pub fn new(max_health: i32, attack: f64, defense: f64, move_speed: f64) -> Self {
        let max_health = max_health.max(1);
        Self {
            health: max_health,
            max_health,
            attack,
            defense,
            move_speed,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn health_ratio(&self) -> f64 {
        f64::from(self.health) / f64::from(self.max_health)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Removes health, clamped at zero. Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount.max(0)).max(0);
        before - self.health
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount.max(0)).min(self.max_health);
    }

    /// Changes the health cap, keeping current health inside the new bounds.
    pub fn set_max_health(&mut self, max_health: i32) {
        self.max_health = max_health.max(1);
        self.health = self.health.clamp(0, self.max_health);
    }

    /// Raises one stat and lowers the others, never below zero; max health follows defense.
    pub fn upgrade(&mut self, stat: Stat) {
        for (which, value) in [
            (Stat::Speed, &mut self.move_speed),
            (Stat::Attack, &mut self.attack),
            (Stat::Defense, &mut self.defense),
        ] {
            *value = if which == stat {
                *value + UPGRADE_GAIN
            } else {
                (*value - UPGRADE_LOSS).max(0.0)
            };
        }
        self.set_max_health(70 + (10.0 * self.defense).floor() as i32);
    }
}

/// Damage dealt by `attack` against `defense`, never negative.
///
/// Negative inputs count as zero, keeping the divisor at least 1.
pub fn compute_damage(attack: f64, defense: f64) -> i32 {
    let attack = attack.max(0.0);
    let defense = defense.max(0.0);
    let raw = 25.0 * (attack - defense) / (defense + 1.0) + 15.0;
    (raw.floor() as i32).max(0)
}

/// Experience and level tracking for the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub skill_points: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            skill_points: 0,
        }
    }
}

impl Progression {
    pub fn xp_to_next(&self) -> u32 {
        self.level.saturating_mul(250).saturating_add(500)
    }

    /// Adds experience and returns how many levels were gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp = self.xp.saturating_add(amount);
        let mut gained = 0;
        while self.xp >= self.xp_to_next() {
            self.xp -= self.xp_to_next();
            self.level += 1;
            self.skill_points += 1;
            gained += 1;
        }
        gained
    }

    /// Spends one skill point on `stat`. Returns false when no point is available.
    pub fn spend(&mut self, stats: &mut EntityStats, stat: Stat) -> bool {
        if self.skill_points == 0 {
            return false;
        }
        self.skill_points -= 1;
        stats.upgrade(stat);
        true
    }
}
