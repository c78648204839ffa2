//! Energy, stance and attack intents for a living actor.

use crate::config::FightConfig;
use crate::state::{ActionState, Actor, Decision, Facing};

/// Cooldown tick-down followed by energy regeneration.
///
/// A fully idle actor (IDLE and below the speed threshold) regenerates at
/// the idle rate, anything else at the active rate.
pub(super) fn regenerate(actor: &mut Actor, config: &FightConfig) {
    actor.cooldown = actor.cooldown.saturating_sub(1);

    let energy = &config.energy;
    let idle = actor.vx.abs() < energy.idle_speed_threshold && actor.state == ActionState::Idle;
    let rate = if idle {
        energy.regen_idle
    } else {
        energy.regen_active
    };
    actor.set_energy(actor.energy + rate, energy.max);
}

/// Movement and stance changes, skipped while the actor is animation locked.
///
/// Later intents override the state chosen by earlier ones in the order
/// move, jump, crouch, guard. Each intent is ignored if energy is short.
pub(super) fn apply_movement(actor: &mut Actor, input: &Decision, config: &FightConfig) {
    let tuning = &config.actor;
    if actor.cooldown > tuning.lock_threshold {
        return;
    }

    let costs = &config.energy;
    let max = costs.max;

    if input.move_left && actor.energy >= costs.cost_move {
        actor.vx -= tuning.move_acceleration;
        actor.set_energy(actor.energy - costs.cost_move, max);
        actor.facing = Facing::Left;
        actor.state = ActionState::MoveLeft;
    } else if input.move_right && actor.energy >= costs.cost_move {
        actor.vx += tuning.move_acceleration;
        actor.set_energy(actor.energy - costs.cost_move, max);
        actor.facing = Facing::Right;
        actor.state = ActionState::MoveRight;
    } else {
        actor.state = ActionState::Idle;
    }

    let grounded = is_grounded(actor, config);

    if input.jump && grounded && actor.energy >= costs.cost_jump {
        actor.vy = tuning.jump_velocity;
        actor.set_energy(actor.energy - costs.cost_jump, max);
        actor.state = ActionState::Jump;
    }

    if input.crouch && grounded && actor.energy >= costs.cost_crouch {
        actor.state = ActionState::Crouch;
        actor.set_energy(actor.energy - costs.cost_crouch, max);
        actor.vx *= tuning.crouch_damping;
    }

    if input.guard && actor.energy >= costs.cost_guard {
        actor.state = ActionState::Guard;
        actor.set_energy(actor.energy - costs.cost_guard, max);
        actor.vx *= tuning.guard_damping;
    }
}

/// Starts an attack when the cooldown has fully elapsed. Light wins over
/// heavy when both are held.
pub(super) fn apply_attacks(actor: &mut Actor, input: &Decision, config: &FightConfig) {
    if actor.cooldown != 0 {
        return;
    }

    let costs = &config.energy;
    let next = if input.attack_light && actor.energy >= costs.cost_light {
        Some((ActionState::AttackLight, costs.cost_light))
    } else if input.attack_heavy && actor.energy >= costs.cost_heavy {
        Some((ActionState::AttackHeavy, costs.cost_heavy))
    } else {
        None
    };

    if let Some((state, cost)) = next {
        actor.state = state;
        actor.vx *= config.actor.attack_damping;
        actor.cooldown = config.combat.attack_cooldown;
        actor.set_energy(actor.energy - cost, costs.max);
    }
}

/// Standing on (or within a pixel of) the floor.
pub(super) fn is_grounded(actor: &Actor, config: &FightConfig) -> bool {
    actor.y >= config.world.ground_y - actor.height - 1.0
}
