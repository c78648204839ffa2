use super::AttackKind;
use crate::config::{AttackProfile, CombatConfig};
use crate::state::{Actor, Facing, Rect};

pub fn attack_profile(kind: AttackKind, combat: &CombatConfig) -> &AttackProfile {
    match kind {
        AttackKind::Light => &combat.light,
        AttackKind::Heavy => &combat.heavy,
    }
}

/// The actor's live hitbox, if any.
///
/// A hitbox exists only in an attack state while the cooldown sits strictly
/// inside the hitbox window; it is projected from the leading edge.
pub fn active_hitbox(actor: &Actor, combat: &CombatConfig) -> Option<Rect> {
    let kind = AttackKind::from_state(actor.state)?;
    let in_window = actor.cooldown > combat.hitbox_window_start
        && actor.cooldown < combat.hitbox_window_end;
    if !in_window {
        return None;
    }

    let profile = attack_profile(kind, combat);
    let x = match actor.facing {
        Facing::Right => actor.x + actor.width,
        Facing::Left => actor.x - profile.reach,
    };
    Some(Rect::new(
        x,
        actor.y + profile.offset_y,
        profile.reach,
        profile.height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FightConfig;
    use crate::state::{ActionState, ControlSource};

    fn attacking(state: ActionState, facing: Facing, cooldown: u32) -> Actor {
        let config = FightConfig::default();
        let mut actor = Actor::spawn(100.0, facing, ControlSource::Human, &config);
        actor.state = state;
        actor.cooldown = cooldown;
        actor
    }

    #[test]
    fn window_is_exclusive_at_both_ends() {
        let combat = CombatConfig::default();
        for cooldown in [0, 5, 15, 19] {
            let actor = attacking(ActionState::AttackLight, Facing::Right, cooldown);
            assert!(active_hitbox(&actor, &combat).is_none(), "cooldown {cooldown}");
        }
        let actor = attacking(ActionState::AttackLight, Facing::Right, 6);
        assert!(active_hitbox(&actor, &combat).is_some());
    }

    #[test]
    fn projects_in_facing_direction() {
        let combat = CombatConfig::default();
        let right = attacking(ActionState::AttackHeavy, Facing::Right, 10);
        let left = attacking(ActionState::AttackHeavy, Facing::Left, 10);

        let r = active_hitbox(&right, &combat).unwrap();
        assert_eq!(r, Rect::new(155.0, 345.0, 66.0, 30.0));
        let l = active_hitbox(&left, &combat).unwrap();
        assert_eq!(l.x, 34.0);
    }

    #[test]
    fn non_attack_states_have_no_hitbox() {
        let combat = CombatConfig::default();
        let actor = attacking(ActionState::Guard, Facing::Right, 10);
        assert!(active_hitbox(&actor, &combat).is_none());
    }
}
