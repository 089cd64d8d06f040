// Gameplay tuning: data-driven values per entity kind, loadable from TOML.

pub mod monster;
pub mod player;
pub mod spawn;

pub use monster::MonsterTuning;
pub use player::PlayerTuning;
pub use spawn::{SpawnPoint, SpawnPolicy};

use super::entity::{AttackPattern, CombatTimings, EntityKind};
use super::geometry::Vector2D;
use super::stats::EntityStats;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

/// Body and combat numbers shared by every kind.
///
/// Has no defaults of its own: a partial `combat` table is filled from the
/// owning kind's values (see [`Tuning`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatTuning {
    /// Hitbox size in world units (one tile is one unit by default).
    pub hitbox_width: f64,
    pub hitbox_height: f64,

    pub max_health: i32,
    pub attack: f64,
    pub defense: f64,

    /// World units per second at full command.
    pub move_speed: f64,

    pub attack_duration_ticks: u32,
    pub attack_cooldown_ticks: u32,
    pub hurt_stun_ticks: u32,

    pub attack_reach: f64,
    pub attack_pattern: AttackPattern,
}

impl CombatTuning {
    pub fn stats(&self) -> EntityStats {
        EntityStats::new(self.max_health, self.attack, self.defense, self.move_speed)
    }

    pub fn size(&self) -> Vector2D {
        Vector2D::new(self.hitbox_width, self.hitbox_height)
    }

    pub fn timings(&self) -> CombatTimings {
        CombatTimings {
            attack_duration: self.attack_duration_ticks,
            attack_cooldown: self.attack_cooldown_ticks,
            hurt_stun: self.hurt_stun_ticks,
        }
    }
}

/// World-level rules that are not tied to one kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Ticks a dead entity stays visible before removal.
    pub death_grace_ticks: u32,

    /// Camera viewport in world units.
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            death_grace_ticks: 60,
            viewport_width: 16.0,
            viewport_height: 12.0,
        }
    }
}

/// Every kind table is read on top of that kind's own defaults, nested
/// `combat` tables included, so a partial table only changes what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    #[serde(deserialize_with = "player_over_defaults")]
    pub player: PlayerTuning,
    #[serde(deserialize_with = "monster_over_defaults")]
    pub monster: MonsterTuning,
    #[serde(deserialize_with = "dragon_over_defaults")]
    pub dragon: MonsterTuning,
    pub spawn: SpawnPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world: WorldTuning::default(),
            player: PlayerTuning::default(),
            monster: MonsterTuning::default(),
            dragon: MonsterTuning::dragon(),
            spawn: SpawnPolicy::default(),
        }
    }
}

impl Tuning {
    /// Tuning for a hostile kind; the player has none.
    pub fn hostile(&self, kind: EntityKind) -> Option<&MonsterTuning> {
        match kind {
            EntityKind::Player => None,
            EntityKind::Monster => Some(&self.monster),
            EntityKind::Dragon => Some(&self.dragon),
        }
    }
}

fn player_over_defaults<'de, D: Deserializer<'de>>(d: D) -> Result<PlayerTuning, D::Error> {
    merge_onto(PlayerTuning::default(), d)
}

fn monster_over_defaults<'de, D: Deserializer<'de>>(d: D) -> Result<MonsterTuning, D::Error> {
    merge_onto(MonsterTuning::default(), d)
}

fn dragon_over_defaults<'de, D: Deserializer<'de>>(d: D) -> Result<MonsterTuning, D::Error> {
    merge_onto(MonsterTuning::dragon(), d)
}

/// Deserializes a table and lays it over `defaults`, recursing into sub-tables.
fn merge_onto<'de, D, T>(defaults: T, deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Serialize + DeserializeOwned,
{
    let mut merged = toml::Value::try_from(defaults).map_err(D::Error::custom)?;
    let patch = toml::Value::deserialize(deserializer)?;
    merge_value(&mut merged, patch);
    merged.try_into().map_err(D::Error::custom)
}

fn merge_value(base: &mut toml::Value, patch: toml::Value) {
    match (base, patch) {
        (toml::Value::Table(base), toml::Value::Table(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::AiPolicy;

    #[test]
    fn partial_toml_keeps_defaults() {
        let tuning: Tuning = toml::from_str(
            r#"
            [world]
            death_grace_ticks = 10

            [monster]
            aggro_radius = 3.5
            ai = "sentinel"

            [[spawn.points]]
            kind = "dragon"
            position = { x = 4.0, y = 5.0 }
            "#,
        )
        .expect("tuning should parse");

        assert_eq!(tuning.world.death_grace_ticks, 10);
        assert_eq!(tuning.world.viewport_width, 16.0);
        assert_eq!(tuning.monster.aggro_radius, 3.5);
        assert_eq!(tuning.monster.ai, AiPolicy::Sentinel);
        assert_eq!(tuning.monster.combat, MonsterTuning::default().combat);
        assert_eq!(tuning.dragon, MonsterTuning::dragon());
        assert_eq!(tuning.spawn.points.len(), 1);
        assert_eq!(tuning.spawn.points[0].kind, EntityKind::Dragon);
        assert_eq!(tuning.spawn.max_alive, SpawnPolicy::default().max_alive);
    }

    #[test]
    fn partial_dragon_table_keeps_dragon_defaults() {
        let tuning: Tuning = toml::from_str(
            r#"
            [dragon]
            aggro_radius = 9.0
            "#,
        )
        .expect("tuning should parse");

        let dragon = MonsterTuning::dragon();
        assert_eq!(tuning.dragon.aggro_radius, 9.0);
        assert_eq!(tuning.dragon.ai, dragon.ai);
        assert_eq!(tuning.dragon.xp_reward, dragon.xp_reward);
        assert_eq!(tuning.dragon.combat, dragon.combat);
        assert_eq!(tuning.dragon.combat.attack_pattern, AttackPattern::Sweep);
    }

    #[test]
    fn partial_combat_table_keeps_its_own_kind_defaults() {
        let tuning: Tuning = toml::from_str(
            r#"
            [monster.combat]
            attack = 2.0

            [dragon.combat]
            max_health = 800

            [player.combat]
            move_speed = 6.5
            "#,
        )
        .expect("tuning should parse");

        let monster = MonsterTuning::default().combat;
        assert_eq!(tuning.monster.combat.attack, 2.0);
        assert_eq!(tuning.monster.combat.move_speed, monster.move_speed);
        assert_eq!(tuning.monster.combat.attack_cooldown_ticks, monster.attack_cooldown_ticks);
        assert_eq!(tuning.monster.ai, MonsterTuning::default().ai);

        let dragon = MonsterTuning::dragon().combat;
        assert_eq!(tuning.dragon.combat.max_health, 800);
        assert_eq!(tuning.dragon.combat.hitbox_width, dragon.hitbox_width);
        assert_eq!(tuning.dragon.combat.attack_pattern, AttackPattern::Sweep);

        let player = PlayerTuning::default();
        assert_eq!(tuning.player.combat.move_speed, 6.5);
        assert_eq!(tuning.player.combat.attack, player.combat.attack);
        assert_eq!(tuning.player.spawn, player.spawn);
    }

    #[test]
    fn wrong_type_inside_a_kind_table_is_rejected() {
        let result: Result<Tuning, _> = toml::from_str(
            r#"
            [dragon.combat]
            max_health = "lots"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn player_has_no_hostile_tuning() {
        let tuning = Tuning::default();
        assert!(tuning.hostile(EntityKind::Player).is_none());
        assert_eq!(tuning.hostile(EntityKind::Dragon).map(|t| t.ai), Some(AiPolicy::Sentinel));
    }
}
