// Enemy collection: owns every Monster/Dragon, runs their AI and the spawn policy.

use super::entity::{Entity, EntityId, EntityKind};
use super::geometry::{Range, Vector2D};
use super::map::TileMap;
use super::systems::ai;
use super::tuning::{MonsterTuning, SpawnPoint, SpawnPolicy, Tuning};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// The player always takes id 0; enemy ids start at 1.
pub const PLAYER_ID: EntityId = EntityId(0);

#[derive(Debug, Clone)]
struct SpawnSlot {
    point: SpawnPoint,
    occupant: Option<EntityId>,
    // Ticks until the slot may spawn again.
    cooldown: u32,
}

#[derive(Debug, Clone)]
pub struct Enemies {
    // Ids are allocated monotonically, so key order is insertion order.
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
    slots: Vec<SpawnSlot>,
    respawn_ticks: u32,
    max_alive: usize,
    // Player level new spawns are scaled for.
    level: u32,
}

impl Default for Enemies {
    fn default() -> Self {
        Self::new(&SpawnPolicy {
            points: Vec::new(),
            ..SpawnPolicy::default()
        })
    }
}

impl Enemies {
    pub fn new(policy: &SpawnPolicy) -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: PLAYER_ID.0 + 1,
            slots: policy
                .points
                .iter()
                .map(|point| SpawnSlot {
                    point: *point,
                    occupant: None,
                    cooldown: 0,
                })
                .collect(),
            respawn_ticks: policy.respawn_ticks,
            max_alive: policy.max_alive,
            level: 1,
        }
    }

    /// Scales later spawns for a player at `level`; live enemies keep their stats.
    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(1);
    }

    /// Creates an enemy with the kind's behavior table, scaled for the current level.
    pub fn spawn(&mut self, kind: EntityKind, position: Vector2D, tuning: &MonsterTuning) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let tuning = &tuning.scaled(self.level);

        let entity = Entity::new(
            id,
            kind,
            position,
            tuning.combat.size(),
            tuning.combat.stats(),
            tuning.behavior(),
        );
        self.entities.insert(id, entity);

        info!(
            enemy_id = id.0,
            kind = ?kind,
            x = position.x,
            y = position.y,
            level = self.level,
            "enemy spawned"
        );
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Enemies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.entities.values().filter(|e| e.is_alive()).count()
    }

    /// Drops every enemy. Spawn points start their respawn countdown.
    pub fn clear(&mut self) {
        self.entities.clear();
        for slot in &mut self.slots {
            if slot.occupant.take().is_some() {
                slot.cooldown = self.respawn_ticks;
            }
        }
    }

    /// Runs each live enemy's AI against the player.
    pub fn think<R: Rng + ?Sized>(&mut self, player: &Entity, rng: &mut R) {
        for enemy in self.entities.values_mut() {
            if !enemy.is_alive() {
                continue;
            }
            ai::decide(enemy, Some(player), rng).apply(enemy);
        }
    }

    /// Removes enemies dead for at least `grace_ticks` and returns them.
    pub fn remove_expired(&mut self, grace_ticks: u32) -> Vec<Entity> {
        let expired: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.is_expired(grace_ticks))
            .map(Entity::id)
            .collect();

        let mut removed = Vec::with_capacity(expired.len());
        for id in expired {
            if let Some(entity) = self.entities.remove(&id) {
                removed.push(entity);
            }
            for slot in &mut self.slots {
                if slot.occupant == Some(id) {
                    slot.occupant = None;
                    slot.cooldown = self.respawn_ticks;
                }
            }
        }
        removed
    }

    /// Ticks spawn cooldowns and fills empty points that are ready.
    ///
    /// A point only spawns when its hitbox is clear of terrain and of `blockers`
    /// (typically the player), and while fewer than `max_alive` enemies live.
    pub fn run_spawns(
        &mut self,
        tuning: &Tuning,
        map: &dyn TileMap,
        blockers: &[Range],
    ) -> Vec<EntityId> {
        let mut spawned = Vec::new();
        for index in 0..self.slots.len() {
            let slot = &mut self.slots[index];
            if slot.occupant.is_some() {
                continue;
            }
            if slot.cooldown > 0 {
                slot.cooldown -= 1;
                continue;
            }

            let point = slot.point;
            let Some(kind_tuning) = tuning.hostile(point.kind) else {
                warn!(kind = ?point.kind, "spawn point for a non-hostile kind ignored");
                continue;
            };
            if self.alive_count() >= self.max_alive {
                continue;
            }

            let area = Range::from_origin(
                point.position,
                kind_tuning.combat.hitbox_width,
                kind_tuning.combat.hitbox_height,
            );
            let crowded = blockers.iter().any(|b| b.overlaps(&area))
                || self
                    .entities
                    .values()
                    .any(|e| e.is_alive() && e.hitbox().overlaps(&area));
            if map.is_obstructed(&area) || crowded {
                continue;
            }

            let id = self.spawn(point.kind, point.position, kind_tuning);
            self.slots[index].occupant = Some(id);
            spawned.push(id);
        }
        spawned
    }
}
