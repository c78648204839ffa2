/// Action state of an actor; drives both rules and animation.
///
/// The discriminants are part of the script contract: scripts read
/// `state` as an integer in `0..=7`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[repr(u8)]
pub enum ActionState {
    #[default]
    Idle = 0,
    MoveLeft = 1,
    MoveRight = 2,
    Jump = 3,
    Crouch = 4,
    AttackLight = 5,
    AttackHeavy = 6,
    Guard = 7,
}

impl ActionState {
    /// Integer code exposed to scripts.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Idle,
            1 => Self::MoveLeft,
            2 => Self::MoveRight,
            3 => Self::Jump,
            4 => Self::Crouch,
            5 => Self::AttackLight,
            6 => Self::AttackHeavy,
            7 => Self::Guard,
            _ => return None,
        })
    }

    #[inline]
    pub const fn is_attack(self) -> bool {
        matches!(self, Self::AttackLight | Self::AttackHeavy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_round_trip_for_every_state() {
        for state in ActionState::iter() {
            assert_eq!(ActionState::from_code(state.code()), Some(state));
        }
        assert_eq!(ActionState::from_code(8), None);
    }

    #[test]
    fn display_uses_screaming_case() {
        assert_eq!(ActionState::AttackHeavy.to_string(), "ATTACK_HEAVY");
        assert_eq!("guard".parse::<ActionState>(), Ok(ActionState::Guard));
    }
}
