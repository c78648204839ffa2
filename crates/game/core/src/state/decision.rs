/// Per-tick intent record produced by a human input source or a script.
///
/// The field set is fixed; the wire names (`left`, `right`, `up`, `down`,
/// `action1`, `action2`, `action3`) are what scripts return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Decision {
    #[cfg_attr(feature = "serde", serde(rename = "left"))]
    pub move_left: bool,
    #[cfg_attr(feature = "serde", serde(rename = "right"))]
    pub move_right: bool,
    #[cfg_attr(feature = "serde", serde(rename = "up"))]
    pub jump: bool,
    #[cfg_attr(feature = "serde", serde(rename = "down"))]
    pub crouch: bool,
    #[cfg_attr(feature = "serde", serde(rename = "action1"))]
    pub attack_light: bool,
    #[cfg_attr(feature = "serde", serde(rename = "action2"))]
    pub attack_heavy: bool,
    #[cfg_attr(feature = "serde", serde(rename = "action3"))]
    pub guard: bool,
}

impl Decision {
    /// All intents released.
    pub const NEUTRAL: Self = Self {
        move_left: false,
        move_right: false,
        jump: false,
        crouch: false,
        attack_light: false,
        attack_heavy: false,
        guard: false,
    };

    /// Script-facing field names, in declaration order.
    pub const FIELD_NAMES: [&'static str; 7] = [
        "left", "right", "up", "down", "action1", "action2", "action3",
    ];

    /// Builds a decision from a lookup over the script-facing field names.
    ///
    /// `lookup` returns `Some(true)` only for a genuine boolean `true`;
    /// anything else (absent, non-boolean, `false`) leaves the intent off.
    pub fn from_fields(mut lookup: impl FnMut(&str) -> Option<bool>) -> Self {
        let mut flag = |name: &str| lookup(name).unwrap_or(false);
        Self {
            move_left: flag("left"),
            move_right: flag("right"),
            jump: flag("up"),
            crouch: flag("down"),
            attack_light: flag("action1"),
            attack_heavy: flag("action2"),
            guard: flag("action3"),
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fields_maps_wire_names() {
        let decision = Decision::from_fields(|name| match name {
            "left" | "action3" => Some(true),
            "up" => Some(false),
            _ => None,
        });
        assert!(decision.move_left);
        assert!(decision.guard);
        assert!(!decision.jump);
        assert!(!decision.attack_heavy);
    }

    #[test]
    fn default_is_neutral() {
        assert!(Decision::default().is_neutral());
    }
}
