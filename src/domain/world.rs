// The simulation: one player, the enemy collection and the per-tick update order.

use super::camera::Camera;
use super::enemies::{Enemies, PLAYER_ID};
use super::entity::{Entity, EntityKind};
use super::geometry::{Range, Vector2D};
use super::map::TileMap;
use super::state::{EntitySnapshot, FrameInput, GamePhase, HudSnapshot, WorldUpdate};
use super::stats::{Progression, Stat};
use super::systems::collision::{self, Body, DamageEvent};
use super::tuning::Tuning;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSettings {
    /// Seconds of simulated time per tick.
    pub tick_seconds: f64,
    /// Seeds enemy AI randomness.
    pub seed: u64,
}

pub struct World {
    map: Arc<dyn TileMap>,
    tuning: Tuning,
    camera: Camera,
    dt: f64,

    player: Entity,
    progression: Progression,
    enemies: Enemies,
    rng: ChaCha8Rng,

    tick: u64,
    phase: GamePhase,
    last: WorldUpdate,
}

impl World {
    /// Builds the world: player at its spawn point, every spawn point filled.
    pub fn new(map: Arc<dyn TileMap>, tuning: Tuning, settings: WorldSettings) -> Self {
        let player_tuning = &tuning.player;
        let player = Entity::new(
            PLAYER_ID,
            EntityKind::Player,
            player_tuning.spawn,
            player_tuning.combat.size(),
            player_tuning.combat.stats(),
            player_tuning.behavior(),
        );
        let camera = Camera::new(Vector2D::new(
            tuning.world.viewport_width,
            tuning.world.viewport_height,
        ));
        let mut enemies = Enemies::new(&tuning.spawn);
        enemies.run_spawns(&tuning, map.as_ref(), &[player.hitbox()]);

        info!(
            seed = settings.seed,
            enemies = enemies.len(),
            "world created"
        );

        let mut world = Self {
            map,
            tuning,
            camera,
            dt: settings.tick_seconds,
            player,
            progression: Progression::default(),
            enemies,
            rng: ChaCha8Rng::seed_from_u64(settings.seed),
            tick: 0,
            phase: GamePhase::Running,
            last: WorldUpdate {
                tick: 0,
                entities: Vec::new(),
                camera: Range::from_origin(Vector2D::ZERO, 0.0, 0.0),
                hud: HudSnapshot::default(),
            },
        };
        world.last = world.snapshot();
        world
    }

    /// Advances the simulation one tick.
    ///
    /// Order: player command, enemy AI, motion (player first), attacks,
    /// rewards, state machines, removal and respawn, game-over check.
    /// Once the game is over this returns the last update unchanged.
    pub fn step(&mut self, input: &FrameInput) -> WorldUpdate {
        if self.phase == GamePhase::GameOver {
            return self.last.clone();
        }
        self.tick += 1;

        self.player.command_move(input.movement);
        if input.attack {
            self.player.request_attack();
        }

        self.enemies.think(&self.player, &mut self.rng);

        self.resolve_motion();

        let events = self.resolve_attacks();
        self.apply_rewards(&events);

        self.player.advance();
        self.enemies.iter_mut().for_each(Entity::advance);

        let grace = self.tuning.world.death_grace_ticks;
        self.enemies.remove_expired(grace);
        self.enemies
            .run_spawns(&self.tuning, self.map.as_ref(), &[self.player.hitbox()]);

        if self.player.is_expired(grace) {
            self.phase = GamePhase::GameOver;
            info!(tick = self.tick, level = self.progression.level, "game over");
        }

        self.last = self.snapshot();
        self.last.clone()
    }

    fn resolve_motion(&mut self) {
        let map = self.map.as_ref();
        let mut bodies: Vec<Body> = std::iter::once(Body::from(&self.player))
            .chain(self.enemies.iter().map(Body::from))
            .collect();

        collision::resolve_motion(&mut self.player, map, &bodies, self.dt);
        bodies[0].hitbox = self.player.hitbox();

        for (index, enemy) in self.enemies.iter_mut().enumerate() {
            collision::resolve_motion(enemy, map, &bodies, self.dt);
            bodies[index + 1].hitbox = enemy.hitbox();
        }
    }

    fn resolve_attacks(&mut self) -> Vec<DamageEvent> {
        let mut events = collision::resolve_attack(&mut self.player, self.enemies.iter_mut());
        for enemy in self.enemies.iter_mut() {
            events.extend(collision::resolve_attack(
                enemy,
                std::iter::once(&mut self.player),
            ));
        }
        events
    }

    fn apply_rewards(&mut self, events: &[DamageEvent]) {
        for event in events.iter().filter(|e| e.killed) {
            if event.target == PLAYER_ID {
                info!(tick = self.tick, killer_id = event.attacker.0, "player died");
                continue;
            }
            let Some(victim) = self.enemies.get(event.target) else {
                continue;
            };
            let reward = victim.behavior().xp_reward;
            info!(
                tick = self.tick,
                enemy_id = event.target.0,
                kind = ?victim.kind(),
                xp = reward,
                "enemy killed"
            );
            if event.attacker == PLAYER_ID {
                let levels = self.progression.gain_xp(reward);
                if levels > 0 {
                    self.enemies.set_level(self.progression.level);
                    info!(
                        level = self.progression.level,
                        skill_points = self.progression.skill_points,
                        "level up"
                    );
                }
            }
        }
    }

    /// Spends a skill point on `stat`. False when none is available or the player is dead.
    pub fn spend_skill_point(&mut self, stat: Stat) -> bool {
        if !self.player.is_alive() {
            return false;
        }
        let spent = self.progression.spend(self.player.stats_mut(), stat);
        if spent {
            info!(stat = ?stat, "skill point spent");
        }
        spent
    }

    pub fn snapshot(&self) -> WorldUpdate {
        let entities = std::iter::once(&self.player)
            .chain(self.enemies.iter())
            .map(EntitySnapshot::from)
            .collect();
        WorldUpdate {
            tick: self.tick,
            entities,
            camera: self.camera.view(self.player.center(), &self.map.bounds()),
            hud: self.hud(),
        }
    }

    pub fn hud(&self) -> HudSnapshot {
        let stats = self.player.stats();
        HudSnapshot {
            health: stats.health(),
            max_health: stats.max_health(),
            level: self.progression.level,
            xp: self.progression.xp,
            xp_to_next: self.progression.xp_to_next(),
            skill_points: self.progression.skill_points,
            enemies: self.enemies.alive_count(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds per tick.
    pub fn tick_seconds(&self) -> f64 {
        self.dt
    }

    pub fn set_tick_seconds(&mut self, seconds: f64) {
        self.dt = seconds;
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn enemies(&self) -> &Enemies {
        &self.enemies
    }

    pub fn map(&self) -> &dyn TileMap {
        self.map.as_ref()
    }
}
