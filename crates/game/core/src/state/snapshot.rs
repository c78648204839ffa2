/// Plain-data copy of an [`super::Actor`] handed to behavior scripts.
///
/// Mutating a snapshot has no effect on the fight.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorSnapshot {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub health: f64,
    pub energy: f64,
    /// [`super::ActionState`] code.
    pub state: u8,
    pub direction: i8,
    pub cooldown: u32,
    pub width: f64,
    pub height: f64,
}

impl ActorSnapshot {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}
