//! Hit outcome types.

use crate::state::ActionState;

/// Attack kind, derived from the attacker's action state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    Light,
    Heavy,
}

impl AttackKind {
    pub const fn from_state(state: ActionState) -> Option<Self> {
        match state {
            ActionState::AttackLight => Some(Self::Light),
            ActionState::AttackHeavy => Some(Self::Heavy),
            _ => None,
        }
    }
}

/// How the defender's stance interacted with the attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Counter {
    /// No stance interaction; full damage.
    #[default]
    None,
    /// Half damage, defender pays the hit penalty in energy.
    Partial,
    /// Zero damage, attacker is stunned.
    Perfect,
}

/// A registered hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitOutcome {
    pub kind: AttackKind,
    pub damage: f64,
    pub counter: Counter,
    /// Defender was turned away from the attacker.
    pub from_behind: bool,
    /// Defender health after the hit.
    pub defender_health: f64,
}

impl HitOutcome {
    pub fn is_perfect_counter(&self) -> bool {
        self.counter == Counter::Perfect
    }
}
