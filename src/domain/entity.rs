// Entity model: kinds, facing, lifecycle state machine and attack activations.

use super::geometry::{Range, Vector2D};
use super::stats::EntityStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Monster,
    Dragon,
}

impl EntityKind {
    pub fn is_enemy(self) -> bool {
        !matches!(self, EntityKind::Player)
    }

    /// Attacks only land across sides: the player hits enemies, enemies hit the player.
    pub fn is_hostile_to(self, other: EntityKind) -> bool {
        self.is_enemy() != other.is_enemy()
    }
}

/// Four-way facing. Screen coordinates: +y points south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    /// Dominant-axis facing for a direction; horizontal wins ties. `None` for zero.
    pub fn from_direction(direction: Vector2D) -> Option<Self> {
        if direction.is_zero() {
            return None;
        }
        let facing = if direction.x.abs() >= direction.y.abs() {
            if direction.x > 0.0 {
                Facing::East
            } else {
                Facing::West
            }
        } else if direction.y > 0.0 {
            Facing::South
        } else {
            Facing::North
        };
        Some(facing)
    }

    pub fn unit(self) -> Vector2D {
        match self {
            Facing::North => Vector2D::new(0.0, -1.0),
            Facing::East => Vector2D::new(1.0, 0.0),
            Facing::South => Vector2D::new(0.0, 1.0),
            Facing::West => Vector2D::new(-1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityState {
    Idle = 0,
    Moving = 1,
    Attacking = 2,
    Hurt = 3,
    Dead = 4,
}

impl EntityState {
    pub const ALL: [EntityState; 5] = [
        EntityState::Idle,
        EntityState::Moving,
        EntityState::Attacking,
        EntityState::Hurt,
        EntityState::Dead,
    ];
}

/// Number of distinct animation indices (states x facings).
pub const ANIMATION_COUNT: u16 = 20;

/// Sprite selector for a (state, facing) pair.
pub const fn animation_index(state: EntityState, facing: Facing) -> u16 {
    state as u16 * 4 + facing as u16
}

/// How an entity picks its commands each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiPolicy {
    /// Driven by the input collaborator.
    Controlled,
    /// Chases the player inside the aggro radius, wanders outside it.
    Hunter,
    /// Chases the player inside the aggro radius, stands still outside it.
    Sentinel,
}

/// Shape of the area an attack covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackPattern {
    /// A box of depth `reach` in front of the facing direction.
    Strike,
    /// The body grown by `reach` on every side.
    Sweep,
}

impl AttackPattern {
    pub fn hitbox(self, body: &Range, facing: Facing, reach: f64) -> Range {
        match self {
            AttackPattern::Sweep => body.expanded(reach),
            AttackPattern::Strike => match facing {
                Facing::East => Range::from_origin(
                    Vector2D::new(body.max.x, body.min.y),
                    reach,
                    body.height(),
                ),
                Facing::West => Range::from_origin(
                    Vector2D::new(body.min.x - reach, body.min.y),
                    reach,
                    body.height(),
                ),
                Facing::North => Range::from_origin(
                    Vector2D::new(body.min.x, body.min.y - reach),
                    body.width(),
                    reach,
                ),
                Facing::South => Range::from_origin(
                    Vector2D::new(body.min.x, body.max.y),
                    body.width(),
                    reach,
                ),
            },
        }
    }
}

/// Tick-counted durations driving the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatTimings {
    pub attack_duration: u32,
    pub attack_cooldown: u32,
    pub hurt_stun: u32,
}

/// Kind-specific behavior table, chosen when the entity spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Behavior {
    pub ai: AiPolicy,
    pub pattern: AttackPattern,
    pub reach: f64,
    pub aggro_radius: f64,
    pub attack_range: f64,
    /// Per-tick probability of attacking once in range and off cooldown.
    pub attack_chance: f64,
    pub timings: CombatTimings,
    pub xp_reward: u32,
}

/// One attack from start to expiry. Tracks who was already hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackActivation {
    serial: u64,
    hit: Vec<EntityId>,
}

impl AttackActivation {
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn has_hit(&self, target: EntityId) -> bool {
        self.hit.contains(&target)
    }

    pub fn record_hit(&mut self, target: EntityId) {
        if !self.has_hit(target) {
            self.hit.push(target);
        }
    }

    pub fn hits(&self) -> &[EntityId] {
        &self.hit
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    position: Vector2D,
    size: Vector2D,
    // Last commanded direction (length <= 1), kept for AI memory.
    heading: Vector2D,
    velocity: Vector2D,
    facing: Facing,
    state: EntityState,
    stats: EntityStats,
    behavior: Behavior,

    attack_ticks: u32,
    cooldown_ticks: u32,
    hurt_ticks: u32,
    dead_ticks: u32,
    activation: Option<AttackActivation>,
    activations_started: u64,
    blocked: bool,
}

impl Entity {
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        position: Vector2D,
        size: Vector2D,
        stats: EntityStats,
        behavior: Behavior,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            size,
            heading: Vector2D::ZERO,
            velocity: Vector2D::ZERO,
            facing: Facing::East,
            state: EntityState::Idle,
            stats,
            behavior,
            attack_ticks: 0,
            cooldown_ticks: 0,
            hurt_ticks: 0,
            dead_ticks: 0,
            activation: None,
            activations_started: 0,
            blocked: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    pub fn size(&self) -> Vector2D {
        self.size
    }

    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    pub fn heading(&self) -> Vector2D {
        self.heading
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn stats(&self) -> &EntityStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut EntityStats {
        &mut self.stats
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn blocked(&self) -> bool {
        self.blocked
    }

    pub fn is_alive(&self) -> bool {
        self.state != EntityState::Dead
    }

    pub fn animation_index(&self) -> u16 {
        animation_index(self.state, self.facing)
    }

    pub fn hitbox(&self) -> Range {
        self.hitbox_at(self.position)
    }

    pub fn hitbox_at(&self, position: Vector2D) -> Range {
        Range::from_origin(position, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vector2D {
        self.hitbox().center()
    }

    pub fn can_attack(&self) -> bool {
        self.is_alive() && self.cooldown_ticks == 0
    }

    pub fn activation(&self) -> Option<&AttackActivation> {
        self.activation.as_ref()
    }

    pub(crate) fn activation_mut(&mut self) -> Option<&mut AttackActivation> {
        self.activation.as_mut()
    }

    /// Area covered by the current attack, if one is active.
    pub fn attack_hitbox(&self) -> Option<Range> {
        if self.state != EntityState::Attacking || self.activation.is_none() {
            return None;
        }
        Some(
            self.behavior
                .pattern
                .hitbox(&self.hitbox(), self.facing, self.behavior.reach),
        )
    }

    /// Ticks spent dead, or `None` while alive.
    pub fn ticks_since_death(&self) -> Option<u32> {
        (!self.is_alive()).then_some(self.dead_ticks)
    }

    /// Dead long enough to be dropped from its collection.
    pub fn is_expired(&self, grace_ticks: u32) -> bool {
        self.ticks_since_death()
            .is_some_and(|ticks| ticks >= grace_ticks)
    }

    /// Sets the movement command. Lengths above 1 are clamped so diagonals are not faster.
    pub fn command_move(&mut self, direction: Vector2D) {
        if !self.is_alive() {
            return;
        }
        let direction = direction.clamp_length(1.0);
        self.heading = direction;
        self.velocity = direction * self.stats.move_speed;
        if let Some(facing) = Facing::from_direction(direction) {
            self.facing = facing;
        }
        if matches!(self.state, EntityState::Idle | EntityState::Moving) {
            self.state = self.locomotion();
        }
    }

    /// Turns toward `direction` without moving.
    pub fn face_towards(&mut self, direction: Vector2D) {
        if !self.is_alive() {
            return;
        }
        if let Some(facing) = Facing::from_direction(direction) {
            self.facing = facing;
        }
    }

    /// Starts an attack activation when the cooldown allows it.
    pub fn request_attack(&mut self) -> bool {
        if !self.can_attack() {
            return false;
        }
        let timings = self.behavior.timings;
        let duration = timings.attack_duration.max(1);
        self.activations_started += 1;
        self.activation = Some(AttackActivation {
            serial: self.activations_started,
            hit: Vec::new(),
        });
        self.state = EntityState::Attacking;
        self.attack_ticks = duration;
        self.cooldown_ticks = timings.attack_cooldown.max(duration);
        true
    }

    /// Applies incoming damage and returns the health actually removed.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        let applied = self.stats.take_damage(amount);
        if self.stats.is_dead() {
            self.die();
        } else if applied > 0 {
            self.state = EntityState::Hurt;
            self.hurt_ticks = self.behavior.timings.hurt_stun.max(1);
            self.attack_ticks = 0;
            self.activation = None;
        }
        applied
    }

    pub(crate) fn place(&mut self, position: Vector2D) {
        if self.is_alive() {
            self.position = position;
        }
    }

    pub(crate) fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    /// End-of-tick state machine step: expire timers and settle the state.
    pub fn advance(&mut self) {
        if !self.is_alive() {
            self.dead_ticks = self.dead_ticks.saturating_add(1);
            return;
        }
        if self.stats.is_dead() {
            self.die();
            return;
        }

        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
        match self.state {
            EntityState::Attacking => {
                self.attack_ticks = self.attack_ticks.saturating_sub(1);
                if self.attack_ticks == 0 {
                    self.activation = None;
                    self.state = self.locomotion();
                }
            }
            EntityState::Hurt => {
                self.hurt_ticks = self.hurt_ticks.saturating_sub(1);
                if self.hurt_ticks == 0 {
                    self.state = self.locomotion();
                }
            }
            EntityState::Idle | EntityState::Moving => self.state = self.locomotion(),
            EntityState::Dead => {}
        }
    }

    fn locomotion(&self) -> EntityState {
        if self.velocity.is_zero() {
            EntityState::Idle
        } else {
            EntityState::Moving
        }
    }

    fn die(&mut self) {
        self.state = EntityState::Dead;
        self.velocity = Vector2D::ZERO;
        self.heading = Vector2D::ZERO;
        self.activation = None;
        self.attack_ticks = 0;
        self.hurt_ticks = 0;
        self.dead_ticks = 0;
    }
}
