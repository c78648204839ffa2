//! Abstraction for sourcing human input.
//!
//! The orchestrator polls an [`InputProvider`] once per tick for every
//! human-controlled actor, so the runtime can be driven by a keyboard layer,
//! recorded fixtures, or nothing at all.
use std::collections::VecDeque;

use arena_core::{Decision, Side};

/// Live input source for human-controlled actors.
///
/// Implementations must answer immediately with whatever is held right now.
pub trait InputProvider {
    fn poll(&mut self, side: Side) -> Decision;
}

/// An input provider that never presses anything.
/// Useful for headless runs where both actors are scripted.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleInput;

impl InputProvider for IdleInput {
    fn poll(&mut self, _side: Side) -> Decision {
        Decision::NEUTRAL
    }
}

/// Replays a fixed sequence of decisions per side, then stays neutral.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    first: VecDeque<Decision>,
    second: VecDeque<Decision>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` repetitions of `decision` for `side`.
    pub fn hold(mut self, side: Side, decision: Decision, count: usize) -> Self {
        let queue = self.queue_mut(side);
        queue.extend(std::iter::repeat_n(decision, count));
        self
    }

    pub fn remaining(&self, side: Side) -> usize {
        match side {
            Side::First => self.first.len(),
            Side::Second => self.second.len(),
        }
    }

    fn queue_mut(&mut self, side: Side) -> &mut VecDeque<Decision> {
        match side {
            Side::First => &mut self.first,
            Side::Second => &mut self.second,
        }
    }
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self, side: Side) -> Decision {
        self.queue_mut(side).pop_front().unwrap_or(Decision::NEUTRAL)
    }
}

impl<P: InputProvider + ?Sized> InputProvider for &mut P {
    fn poll(&mut self, side: Side) -> Decision {
        (**self).poll(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_input_replays_then_goes_neutral() {
        let right = Decision {
            move_right: true,
            ..Decision::NEUTRAL
        };
        let mut input = ScriptedInput::new().hold(Side::First, right, 2);
        assert_eq!(input.poll(Side::First), right);
        assert!(input.poll(Side::Second).is_neutral());
        assert_eq!(input.poll(Side::First), right);
        assert!(input.poll(Side::First).is_neutral());
        assert_eq!(input.remaining(Side::First), 0);
    }
}
