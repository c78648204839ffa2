//! Damage, counter and knockback resolution.

use super::hitbox::attack_profile;
use super::{AttackKind, Counter, HitOutcome};
use crate::config::{CombatConfig, FightConfig};
use crate::state::{ActionState, Actor, Facing};

// ============================================================================
// Facing
// ============================================================================

/// Whether `defender` is turned away from `attacker`.
///
/// The attacker is "to the right" when its x is strictly greater; a defender
/// facing away from that side is hit from behind.
pub fn is_facing_away(attacker: &Actor, defender: &Actor) -> bool {
    let attacker_to_right = attacker.x > defender.x;
    match defender.facing {
        Facing::Left => attacker_to_right,
        Facing::Right => !attacker_to_right,
    }
}

// ============================================================================
// Counters
// ============================================================================

/// Stance interaction for a defender that faces the attacker.
pub fn counter_for(kind: AttackKind, defender_state: ActionState) -> Counter {
    match (defender_state, kind) {
        (ActionState::Guard, AttackKind::Light) | (ActionState::Crouch, AttackKind::Heavy) => {
            Counter::Perfect
        }
        (ActionState::Guard, AttackKind::Heavy) | (ActionState::Crouch, AttackKind::Light) => {
            Counter::Partial
        }
        _ => Counter::None,
    }
}

/// Damage multiplier for a counter result.
pub fn damage_multiplier(counter: Counter, combat: &CombatConfig) -> f64 {
    match counter {
        Counter::None => 1.0,
        Counter::Partial => combat.partial_mitigation,
        Counter::Perfect => 0.0,
    }
}

// ============================================================================
// Hit resolution
// ============================================================================

/// Tests `attacker`'s hitbox against `defender` and applies a hit.
///
/// Returns `None` without touching either actor when there is no live
/// hitbox, the defender is already down, or the boxes do not overlap. On a
/// hit the hitbox is consumed so an attack lands at most once.
pub fn resolve_hit(
    attacker: &mut Actor,
    defender: &mut Actor,
    config: &FightConfig,
) -> Option<HitOutcome> {
    let hitbox = attacker.hitbox?;
    if !defender.is_alive() || !hitbox.intersects(&defender.bounds()) {
        return None;
    }
    let kind = AttackKind::from_state(attacker.state)?;

    let combat = &config.combat;
    let profile = attack_profile(kind, combat);
    let from_behind = is_facing_away(attacker, defender);

    let (damage, counter) = if from_behind {
        (profile.damage * combat.backstab_multiplier, Counter::None)
    } else {
        let counter = counter_for(kind, defender.state);
        (profile.damage * damage_multiplier(counter, combat), counter)
    };

    match counter {
        Counter::Perfect => attacker.cooldown += combat.counter_stun,
        Counter::Partial => {
            defender.set_energy(defender.energy - config.energy.hit_penalty, config.energy.max)
        }
        Counter::None => {}
    }

    defender.set_health(defender.health - damage, config.actor.max_health);
    defender.vx = attacker.facing.as_f64() * profile.knockback;
    defender.vy = combat.knockback_pop;
    attacker.hitbox = None;

    Some(HitOutcome {
        kind,
        damage,
        counter,
        from_behind,
        defender_health: defender.health,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::active_hitbox;
    use crate::state::ControlSource;

    /// Attacker at x=100 facing right mid-swing, defender at x=150.
    fn duel(kind: ActionState, defender_state: ActionState, defender_facing: Facing) -> (Actor, Actor) {
        let config = FightConfig::default();
        let mut attacker = Actor::spawn(100.0, Facing::Right, ControlSource::Human, &config);
        attacker.state = kind;
        attacker.cooldown = 10;
        attacker.hitbox = active_hitbox(&attacker, &config.combat);

        let mut defender = Actor::spawn(150.0, defender_facing, ControlSource::Human, &config);
        defender.state = defender_state;
        (attacker, defender)
    }

    #[test]
    fn guard_perfectly_counters_light() {
        let config = FightConfig::default();
        let (mut a, mut d) = duel(ActionState::AttackLight, ActionState::Guard, Facing::Left);
        let outcome = resolve_hit(&mut a, &mut d, &config).unwrap();
        assert_eq!(outcome.damage, 0.0);
        assert!(outcome.is_perfect_counter());
        assert_eq!(d.health, 100.0);
        assert_eq!(a.cooldown, 15);
    }

    #[test]
    fn crouch_perfectly_counters_heavy() {
        let config = FightConfig::default();
        let (mut a, mut d) = duel(ActionState::AttackHeavy, ActionState::Crouch, Facing::Left);
        let outcome = resolve_hit(&mut a, &mut d, &config).unwrap();
        assert_eq!(outcome.damage, 0.0);
        assert_eq!(d.health, 100.0);
        assert_eq!(a.cooldown, 15);
    }

    #[test]
    fn guard_halves_heavy_and_drains_energy() {
        let config = FightConfig::default();
        let (mut a, mut d) = duel(ActionState::AttackHeavy, ActionState::Guard, Facing::Left);
        d.energy = 50.0;
        let outcome = resolve_hit(&mut a, &mut d, &config).unwrap();
        assert_eq!(outcome.counter, Counter::Partial);
        assert_eq!(d.health, 95.0);
        assert_eq!(d.energy, 49.0);
        assert_eq!(a.cooldown, 10);
    }

    #[test]
    fn crouch_halves_light_and_drains_energy() {
        let config = FightConfig::default();
        let (mut a, mut d) = duel(ActionState::AttackLight, ActionState::Crouch, Facing::Left);
        d.energy = 50.0;
        resolve_hit(&mut a, &mut d, &config).unwrap();
        assert_eq!(d.health, 97.5);
        assert_eq!(d.energy, 49.0);
    }

    #[test]
    fn facing_away_takes_full_damage_without_stun() {
        let config = FightConfig::default();
        for stance in [ActionState::Guard, ActionState::Crouch, ActionState::Idle] {
            let (mut a, mut d) = duel(ActionState::AttackLight, stance, Facing::Right);
            let outcome = resolve_hit(&mut a, &mut d, &config).unwrap();
            assert!(outcome.from_behind);
            assert_eq!(d.health, 95.0, "stance {stance}");
            assert_eq!(a.cooldown, 10);
        }
    }

    #[test]
    fn backstab_multiplier_scales_rear_hits() {
        let mut config = FightConfig::default();
        config.combat.backstab_multiplier = 3.0;
        let (mut a, mut d) = duel(ActionState::AttackHeavy, ActionState::Idle, Facing::Right);
        resolve_hit(&mut a, &mut d, &config).unwrap();
        assert_eq!(d.health, 70.0);
    }

    #[test]
    fn health_never_drops_below_zero() {
        let config = FightConfig::default();
        let (mut a, mut d) = duel(ActionState::AttackHeavy, ActionState::Idle, Facing::Left);
        d.health = 3.0;
        resolve_hit(&mut a, &mut d, &config).unwrap();
        assert_eq!(d.health, 0.0);
    }

    #[test]
    fn hit_consumes_hitbox_and_applies_knockback() {
        let config = FightConfig::default();
        let (mut a, mut d) = duel(ActionState::AttackHeavy, ActionState::Idle, Facing::Left);
        resolve_hit(&mut a, &mut d, &config).unwrap();
        assert!(a.hitbox.is_none());
        assert_eq!(d.vx, 15.0);
        assert_eq!(d.vy, -5.0);
        assert!(resolve_hit(&mut a, &mut d, &config).is_none());
    }

    #[test]
    fn downed_defender_is_not_hit() {
        let config = FightConfig::default();
        let (mut a, mut d) = duel(ActionState::AttackLight, ActionState::Idle, Facing::Left);
        d.health = 0.0;
        assert!(resolve_hit(&mut a, &mut d, &config).is_none());
        assert!(a.hitbox.is_some());
    }
}
