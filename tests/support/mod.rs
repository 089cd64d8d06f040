// Shared fixtures for integration tests: quiet tracing, open maps and small worlds.
use std::sync::{Arc, OnceLock};

use tilebound::domain::tuning::{SpawnPoint, SpawnPolicy};
use tilebound::domain::{EntityKind, GridMap, TileMap, Tuning, Vector2D, World, WorldSettings};
use tilebound::use_cases::GameSettings;

// One-time guard so every test binary installs the subscriber once.
static TRACING: OnceLock<()> = OnceLock::new();

pub const TICK_RATE: u32 = 60;

// Route logs through the test harness so they only show for failing tests.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

pub fn settings() -> GameSettings {
    GameSettings {
        tick_rate: TICK_RATE,
        input_channel_capacity: 64,
        max_catch_up_ticks: 8,
    }
}

pub fn open_map() -> Arc<dyn TileMap> {
    Arc::new(GridMap::new(24, 16, 1.0))
}

// Default tuning without any enemies.
pub fn empty_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.spawn.points.clear();
    tuning
}

// One aggressive monster right next to the player, strong enough to kill in one hit.
pub fn ambush_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.player.spawn = Vector2D::new(2.0, 2.0);
    tuning.monster.attack_chance = 1.0;
    tuning.monster.combat.attack = 10.0;
    tuning.world.death_grace_ticks = 5;
    tuning.spawn = SpawnPolicy {
        points: vec![SpawnPoint {
            kind: EntityKind::Monster,
            position: Vector2D::new(3.0, 2.0),
        }],
        respawn_ticks: 600,
        max_alive: 1,
    };
    tuning
}

pub fn world(tuning: Tuning, seed: u64) -> World {
    world_with_step(tuning, seed, 1.0 / f64::from(TICK_RATE))
}

pub fn world_with_step(tuning: Tuning, seed: u64, tick_seconds: f64) -> World {
    World::new(open_map(), tuning, WorldSettings { tick_seconds, seed })
}
