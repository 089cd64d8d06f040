use crate::domain::entity::{Entity, EntityId};
use crate::domain::geometry::{Range, Vector2D};
use crate::domain::map::TileMap;
use crate::domain::stats::compute_damage;
use tracing::debug;

/// Gap left between a hitbox and the tile edge it was snapped against.
pub const EPSILON: f64 = 1e-6;

/// Collision view of one entity, taken before anyone moves this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: EntityId,
    pub hitbox: Range,
    /// Dead bodies never block.
    pub solid: bool,
}

impl From<&Entity> for Body {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id(),
            hitbox: e.hitbox(),
            solid: e.is_alive(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveOutcome {
    pub blocked_x: bool,
    pub blocked_y: bool,
    /// Displacement actually applied this tick.
    pub moved: Vector2D,
}

impl MoveOutcome {
    pub fn blocked(&self) -> bool {
        self.blocked_x || self.blocked_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    pub attacker: EntityId,
    pub target: EntityId,
    pub amount: i32,
    pub killed: bool,
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, v: Vector2D) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    fn with(self, v: Vector2D, value: f64) -> Vector2D {
        match self {
            Axis::X => Vector2D::new(value, v.y),
            Axis::Y => Vector2D::new(v.x, value),
        }
    }
}

/// Moves `entity` by `velocity * dt`, x axis first, then y.
///
/// Each axis is resolved on its own so a wall on one axis leaves the other
/// free (sliding). `others` may include the entity itself; it is skipped by id.
pub fn resolve_motion(
    entity: &mut Entity,
    map: &dyn TileMap,
    others: &[Body],
    dt: f64,
) -> MoveOutcome {
    if !entity.is_alive() {
        return MoveOutcome::default();
    }

    let start = entity.position();
    let delta = entity.velocity() * dt;
    let mover = Mover {
        id: entity.id(),
        size: entity.size(),
        map,
        others,
    };

    let mut position = start;
    let blocked_x = mover.resolve_axis(Axis::X, &mut position, delta.x);
    let blocked_y = mover.resolve_axis(Axis::Y, &mut position, delta.y);

    entity.place(position);
    let outcome = MoveOutcome {
        blocked_x,
        blocked_y,
        moved: position - start,
    };
    entity.set_blocked(outcome.blocked());

    if outcome.blocked() {
        debug!(
            entity_id = entity.id().0,
            blocked_x,
            blocked_y,
            x = position.x,
            y = position.y,
            "move blocked"
        );
    }
    outcome
}

struct Mover<'a> {
    id: EntityId,
    size: Vector2D,
    map: &'a dyn TileMap,
    others: &'a [Body],
}

impl Mover<'_> {
    fn hitbox(&self, position: Vector2D) -> Range {
        Range::from_origin(position, self.size.x, self.size.y)
    }

    /// Advances one axis in sub-steps of at most half a tile. Returns true when blocked.
    fn resolve_axis(&self, axis: Axis, position: &mut Vector2D, motion: f64) -> bool {
        if motion == 0.0 {
            return false;
        }

        let tile = self.map.tile_size();
        let max_step = (tile * 0.5).max(EPSILON);
        let steps = (motion.abs() / max_step).ceil().max(1.0) as u32;
        let origin = axis.of(*position);

        for i in 1..=steps {
            let value = if i == steps {
                origin + motion
            } else {
                origin + motion * f64::from(i) / f64::from(steps)
            };
            let candidate = axis.with(*position, value);

            if self.map.is_obstructed(&self.hitbox(candidate)) {
                if let Some(snapped) = self.snap_to_edge(axis, *position, candidate, motion) {
                    *position = snapped;
                }
                return true;
            }
            if self.blocked_by_bodies(*position, candidate) {
                return true;
            }
            *position = candidate;
        }
        false
    }

    /// Flush position against the tile edge the candidate ran into, if it is free.
    fn snap_to_edge(
        &self,
        axis: Axis,
        current: Vector2D,
        candidate: Vector2D,
        motion: f64,
    ) -> Option<Vector2D> {
        let tile = self.map.tile_size();
        let extent = axis.of(self.size);
        let lead = axis.of(candidate);

        let value = if motion > 0.0 {
            let edge = ((lead + extent) / tile).ceil() - 1.0;
            edge * tile - extent - EPSILON
        } else {
            let edge = (lead / tile).floor() + 1.0;
            edge * tile + EPSILON
        };

        // Never snap backwards by more than the gap itself.
        let regress = (axis.of(current) - value) * motion.signum();
        if regress > 2.0 * EPSILON {
            return None;
        }

        let snapped = axis.with(current, value);
        let hitbox = self.hitbox(snapped);
        if self.map.is_obstructed(&hitbox) || self.blocked_by_bodies(current, snapped) {
            return None;
        }
        Some(snapped)
    }

    /// A move is rejected when it creates a new overlap; existing overlaps may separate.
    fn blocked_by_bodies(&self, current: Vector2D, candidate: Vector2D) -> bool {
        let from = self.hitbox(current);
        let to = self.hitbox(candidate);
        self.others.iter().any(|body| {
            body.solid
                && body.id != self.id
                && body.hitbox.overlaps(&to)
                && !body.hitbox.overlaps(&from)
        })
    }
}

/// Applies the attacker's active attack to every overlapping, hostile, live target.
///
/// Each target is hit at most once per activation. Targets are visited in the
/// order given, so callers pass them in insertion order.
pub fn resolve_attack<'a, I>(attacker: &mut Entity, targets: I) -> Vec<DamageEvent>
where
    I: IntoIterator<Item = &'a mut Entity>,
{
    let Some(area) = attacker.attack_hitbox() else {
        return Vec::new();
    };
    let attacker_id = attacker.id();
    let attacker_kind = attacker.kind();
    let attack = attacker.stats().attack;
    let Some(activation) = attacker.activation_mut() else {
        return Vec::new();
    };

    let mut events = Vec::new();
    for target in targets {
        if target.id() == attacker_id
            || !target.is_alive()
            || !attacker_kind.is_hostile_to(target.kind())
            || activation.has_hit(target.id())
            || !area.overlaps(&target.hitbox())
        {
            continue;
        }

        let amount = target.apply_damage(compute_damage(attack, target.stats().defense));
        activation.record_hit(target.id());

        let event = DamageEvent {
            attacker: attacker_id,
            target: target.id(),
            amount,
            killed: !target.is_alive(),
        };
        debug!(
            attacker_id = attacker_id.0,
            target_id = event.target.0,
            amount,
            target_hp = target.stats().health(),
            "hit"
        );
        events.push(event);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::tests::{behavior, entity};
    use crate::domain::entity::{EntityKind, EntityState, Facing};
    use crate::domain::map::GridMap;
    use crate::domain::stats::EntityStats;

    const DT: f64 = 1.0 / 60.0;

    fn at(id: u64, kind: EntityKind, x: f64, y: f64) -> Entity {
        Entity::new(
            EntityId(id),
            kind,
            Vector2D::new(x, y),
            Vector2D::new(1.0, 1.0),
            EntityStats::new(100, 1.0, 1.0, 6.0),
            behavior(),
        )
    }

    fn push(e: &mut Entity, direction: Vector2D, speed: f64) {
        e.stats_mut().move_speed = speed;
        e.command_move(direction);
    }

    #[test]
    fn open_field_run_matches_speed() {
        let map = GridMap::new(40, 40, 1.0);
        let mut player = entity(EntityKind::Player, 100);
        player.command_move(Vector2D::new(1.0, 0.0));

        for _ in 0..10 {
            let outcome = resolve_motion(&mut player, &map, &[], DT);
            assert!(!outcome.blocked());
            player.advance();
        }

        let expected = player.stats().move_speed * 10.0 / 60.0;
        assert!((player.position().x - expected).abs() < 1e-9);
        assert_eq!(player.position().y, 0.0);
        assert_eq!(player.state(), EntityState::Moving);
        assert_eq!(player.facing(), Facing::East);
    }

    #[test]
    fn blocked_axis_snaps_to_edge_while_other_axis_slides() {
        let map = GridMap::from_rows(&["..#.", "..#.", "..#.", "..#."], 1.0).expect("map");
        let mut e = at(1, EntityKind::Player, 0.5, 0.5);
        // One tile right and half a tile down in a single tick.
        let velocity = Vector2D::new(60.0, 30.0);
        push(&mut e, velocity.normalized(), velocity.norm());

        let outcome = resolve_motion(&mut e, &map, &[], DT);

        assert!(outcome.blocked_x);
        assert!(!outcome.blocked_y);
        assert!((e.position().x - (2.0 - 1.0 - EPSILON)).abs() < 1e-9);
        assert!((e.position().y - 1.0).abs() < 1e-9);
        assert!(e.blocked());
    }

    #[test]
    fn flush_hitbox_stays_at_the_wall() {
        let map = GridMap::from_rows(&[".#", ".#", ".."], 1.0).expect("map");
        let mut e = at(1, EntityKind::Player, 0.0, 0.0);
        let velocity = Vector2D::new(60.0, 30.0);
        push(&mut e, velocity.normalized(), velocity.norm());

        let outcome = resolve_motion(&mut e, &map, &[], DT);

        assert!(outcome.blocked_x);
        assert!(e.position().x <= 0.0);
        assert!((e.position().x - (1.0 - 1.0 - EPSILON)).abs() <= EPSILON);
        assert!((e.position().y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn moving_left_snaps_past_the_wall_edge() {
        let map = GridMap::from_rows(&["#...."], 1.0).expect("map");
        let mut e = at(1, EntityKind::Player, 2.5, 0.0);
        push(&mut e, Vector2D::new(-1.0, 0.0), 120.0);

        let outcome = resolve_motion(&mut e, &map, &[], DT);

        assert!(outcome.blocked_x);
        assert!((e.position().x - (1.0 + EPSILON)).abs() < 1e-9);
        assert_eq!(e.facing(), Facing::West);
    }

    #[test]
    fn fast_moves_do_not_tunnel_through_thin_walls() {
        let map = GridMap::from_rows(&["...#......"], 1.0).expect("map");
        let mut e = at(1, EntityKind::Player, 0.0, 0.0);
        // Six tiles in one tick.
        push(&mut e, Vector2D::new(1.0, 0.0), 360.0);

        resolve_motion(&mut e, &map, &[], DT);

        assert!(e.position().x < 2.0);
        assert!(e.blocked());
    }

    #[test]
    fn map_edges_block() {
        let map = GridMap::new(3, 3, 1.0);
        let mut e = at(1, EntityKind::Player, 0.0, 0.0);
        push(&mut e, Vector2D::new(0.0, -1.0), 6.0);

        let outcome = resolve_motion(&mut e, &map, &[], DT);

        assert!(outcome.blocked_y);
        assert_eq!(e.position().x, 0.0);
        assert!(e.position().y >= 0.0 && e.position().y <= 2.0 * EPSILON);
    }

    #[test]
    fn live_bodies_block_new_overlaps() {
        let map = GridMap::new(10, 3, 1.0);
        let mut mover = at(1, EntityKind::Monster, 0.0, 0.0);
        let wall = at(2, EntityKind::Monster, 1.5, 0.0);
        let bodies = [Body::from(&mover), Body::from(&wall)];
        push(&mut mover, Vector2D::new(1.0, 0.0), 60.0);

        let outcome = resolve_motion(&mut mover, &map, &bodies, DT);

        assert!(outcome.blocked_x);
        assert!(!mover.hitbox().overlaps(&wall.hitbox()));
        assert!(mover.position().x >= 0.0);
    }

    #[test]
    fn dead_bodies_do_not_block() {
        let map = GridMap::new(10, 3, 1.0);
        let mut mover = at(1, EntityKind::Monster, 0.0, 0.0);
        let mut corpse = at(2, EntityKind::Monster, 1.5, 0.0);
        corpse.apply_damage(1_000);
        let bodies = [Body::from(&corpse)];
        push(&mut mover, Vector2D::new(1.0, 0.0), 60.0);

        let outcome = resolve_motion(&mut mover, &map, &bodies, DT);

        assert!(!outcome.blocked());
        assert!((mover.position().x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn overlapping_bodies_may_separate() {
        let map = GridMap::new(10, 3, 1.0);
        let mut mover = at(1, EntityKind::Monster, 2.0, 0.0);
        let other = at(2, EntityKind::Monster, 2.5, 0.0);
        let bodies = [Body::from(&other)];
        push(&mut mover, Vector2D::new(-1.0, 0.0), 30.0);

        let outcome = resolve_motion(&mut mover, &map, &bodies, DT);

        assert!(!outcome.blocked());
        assert!((mover.position().x - 1.5).abs() < 1e-9);
    }

    #[test]
    fn dead_entities_do_not_move() {
        let map = GridMap::new(10, 3, 1.0);
        let mut e = at(1, EntityKind::Monster, 2.0, 0.0);
        push(&mut e, Vector2D::new(1.0, 0.0), 60.0);
        e.apply_damage(1_000);

        let outcome = resolve_motion(&mut e, &map, &[], DT);

        assert_eq!(outcome, MoveOutcome::default());
        assert_eq!(e.position(), Vector2D::new(2.0, 0.0));
    }

    #[test]
    fn one_activation_hits_each_overlapping_target_once() {
        let mut player = at(0, EntityKind::Player, 0.0, 0.0);
        player.stats_mut().attack = 3.0;
        let mut targets: Vec<Entity> = (1..=3)
            .map(|id| at(id, EntityKind::Monster, 1.2, 0.0))
            .collect();
        assert!(player.request_attack());

        let first = resolve_attack(&mut player, targets.iter_mut());
        let second = resolve_attack(&mut player, targets.iter_mut());

        assert_eq!(first.len(), 3);
        assert!(second.is_empty());
        let ids: Vec<u64> = first.iter().map(|e| e.target.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for target in &targets {
            let expected = 100 - compute_damage(3.0, 1.0);
            assert_eq!(target.stats().health(), expected);
        }
        let activation = player.activation().expect("activation");
        assert_eq!(activation.hits().len(), 3);
    }

    #[test]
    fn attacks_skip_allies_dead_and_out_of_reach() {
        let mut monster = at(1, EntityKind::Monster, 0.0, 0.0);
        let mut ally = at(2, EntityKind::Monster, 1.2, 0.0);
        let mut far = at(0, EntityKind::Player, 5.0, 0.0);
        let mut dead = at(3, EntityKind::Player, 1.2, 0.0);
        dead.apply_damage(1_000);
        monster.request_attack();

        let events = resolve_attack(
            &mut monster,
            [&mut ally, &mut far, &mut dead].into_iter(),
        );

        assert!(events.is_empty());
        assert_eq!(ally.stats().health(), 100);
        assert_eq!(far.stats().health(), 100);
    }

    #[test]
    fn killing_blow_is_reported() {
        let mut player = at(0, EntityKind::Player, 0.0, 0.0);
        let mut monster = at(1, EntityKind::Monster, 1.2, 0.0);
        monster.stats_mut().set_max_health(10);
        player.request_attack();

        let events = resolve_attack(&mut player, std::iter::once(&mut monster));

        assert_eq!(events.len(), 1);
        assert!(events[0].killed);
        assert_eq!(events[0].amount, 10);
        assert_eq!(monster.state(), EntityState::Dead);
        assert_eq!(monster.stats().health(), 0);
    }

    #[test]
    fn no_attack_no_events() {
        let mut player = at(0, EntityKind::Player, 0.0, 0.0);
        let mut monster = at(1, EntityKind::Monster, 1.2, 0.0);
        assert!(resolve_attack(&mut player, std::iter::once(&mut monster)).is_empty());
    }
}
