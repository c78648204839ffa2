//! Integration, boundaries and body separation.

use crate::config::FightConfig;
use crate::state::{ActionState, Actor};

/// Knocked-out body: falls until it rests `ragdoll_floor_offset` above the
/// floor, then slides with decaying horizontal velocity.
pub(super) fn ragdoll(actor: &mut Actor, config: &FightConfig) {
    let rest_y = config.world.ground_y - config.actor.ragdoll_floor_offset;

    actor.y += actor.vy;
    actor.vy += config.world.gravity;
    if actor.y > rest_y {
        actor.y = rest_y;
        actor.vy = 0.0;
        actor.x += actor.vx;
        actor.vx *= config.actor.ragdoll_slide_decay;
    } else {
        actor.x += actor.vx;
    }
    clamp_to_walls(actor, config);
}

pub(super) fn integrate(actor: &mut Actor, config: &FightConfig) {
    let world = &config.world;

    actor.x += actor.vx;
    actor.y += actor.vy;
    actor.vy += world.gravity;
    actor.vx *= world.friction;

    let floor = world.ground_y - actor.height;
    if actor.y > floor {
        actor.y = floor;
        actor.vy = 0.0;
        if actor.state == ActionState::Jump {
            actor.state = ActionState::Idle;
        }
    }
    clamp_to_walls(actor, config);
}

fn clamp_to_walls(actor: &mut Actor, config: &FightConfig) {
    let max_x = config.world.arena_width - actor.width;
    actor.x = actor.x.clamp(0.0, max_x);
}

/// Pushes two vertically overlapping bodies apart by half the horizontal
/// penetration each.
pub(super) fn separate(first: &mut Actor, second: &mut Actor) {
    if !first.bounds().overlaps_vertically(&second.bounds()) {
        return;
    }

    let (left, right) = if first.x < second.x {
        (first, second)
    } else {
        (second, first)
    };
    let overlap = left.x + left.width - right.x;
    if overlap > 0.0 {
        left.x -= overlap / 2.0;
        right.x += overlap / 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ControlSource, Facing};

    fn actor_at(x: f64) -> Actor {
        Actor::spawn(x, Facing::Right, ControlSource::Human, &FightConfig::default())
    }

    #[test]
    fn landing_from_jump_resets_state() {
        let config = FightConfig::default();
        let mut actor = actor_at(100.0);
        actor.state = ActionState::Jump;
        actor.vy = 4.0;
        integrate(&mut actor, &config);
        assert_eq!(actor.y, config.ground_top());
        assert_eq!(actor.vy, 0.0);
        assert_eq!(actor.state, ActionState::Idle);
    }

    #[test]
    fn walls_clamp_position() {
        let config = FightConfig::default();
        let mut actor = actor_at(790.0);
        actor.vx = 30.0;
        integrate(&mut actor, &config);
        assert_eq!(actor.x, 745.0);

        let mut actor = actor_at(2.0);
        actor.vx = -10.0;
        integrate(&mut actor, &config);
        assert_eq!(actor.x, 0.0);
    }

    #[test]
    fn ragdoll_rests_above_floor_and_slides() {
        let config = FightConfig::default();
        let mut actor = actor_at(300.0);
        actor.health = 0.0;
        actor.vx = 8.0;
        actor.vy = 0.0;
        for _ in 0..60 {
            ragdoll(&mut actor, &config);
        }
        assert_eq!(actor.y, 375.0);
        assert!(actor.x > 300.0);
        assert!(actor.vx.abs() < 1e-3);
    }

    #[test]
    fn separation_is_symmetric() {
        let mut a = actor_at(100.0);
        let mut b = actor_at(135.0);
        separate(&mut a, &mut b);
        assert_eq!(a.x, 90.0);
        assert_eq!(b.x, 145.0);

        let mut a = actor_at(135.0);
        let mut b = actor_at(100.0);
        separate(&mut a, &mut b);
        assert_eq!(a.x, 145.0);
        assert_eq!(b.x, 90.0);
    }
}
