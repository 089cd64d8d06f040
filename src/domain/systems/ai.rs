use crate::domain::entity::{AiPolicy, Entity};
use crate::domain::geometry::Vector2D;
use rand::Rng;

/// Wander speed as a fraction of full speed.
const WANDER_SPEED: f64 = 0.5;
/// How far a wandering heading drifts per tick.
const WANDER_JITTER: f64 = 0.25;

/// One tick of intent for an entity, produced by AI or input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Command {
    pub movement: Vector2D,
    /// Turn toward this direction after the movement command.
    pub face: Option<Vector2D>,
    pub attack: bool,
}

impl Command {
    pub fn apply(self, entity: &mut Entity) {
        entity.command_move(self.movement);
        if let Some(direction) = self.face {
            entity.face_towards(direction);
        }
        if self.attack {
            entity.request_attack();
        }
    }
}

/// Picks the next command for an AI-driven entity.
///
/// The target is only considered while it is alive. Randomness comes from the
/// caller so a seeded world stays deterministic.
pub fn decide<R: Rng + ?Sized>(entity: &Entity, target: Option<&Entity>, rng: &mut R) -> Command {
    let behavior = entity.behavior();
    if !entity.is_alive() || behavior.ai == AiPolicy::Controlled {
        return Command::default();
    }

    if let Some(target) = target.filter(|t| t.is_alive()) {
        let offset = target.center() - entity.center();
        let distance = offset.norm();

        if distance <= behavior.attack_range {
            let chance = behavior.attack_chance.clamp(0.0, 1.0);
            return Command {
                movement: Vector2D::ZERO,
                face: Some(offset),
                attack: entity.can_attack() && rng.gen_bool(chance),
            };
        }
        if distance <= behavior.aggro_radius {
            return Command {
                movement: offset.normalized(),
                face: None,
                attack: false,
            };
        }
    }

    match behavior.ai {
        AiPolicy::Hunter => Command {
            movement: wander(entity.heading(), rng),
            face: None,
            attack: false,
        },
        AiPolicy::Sentinel | AiPolicy::Controlled => Command::default(),
    }
}

fn wander<R: Rng + ?Sized>(heading: Vector2D, rng: &mut R) -> Vector2D {
    let jitter = Vector2D::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
    (heading + jitter * WANDER_JITTER).clamp_length(WANDER_SPEED)
}
