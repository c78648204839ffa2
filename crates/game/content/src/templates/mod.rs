//! Default behavior scripts.
//!
//! A slot with no stored script starts from its template.

use arena_core::ScriptSlot;

/// Counter-based fighter, the default for [`ScriptSlot::A`].
pub const STRATEGIC_TEMPLATE: &str = include_str!("strategic.js");

/// Randomized fighter, the default for [`ScriptSlot::B`].
pub const RANDOM_TEMPLATE: &str = include_str!("random.js");

pub fn template_for(slot: ScriptSlot) -> &'static str {
    match slot {
        ScriptSlot::A => STRATEGIC_TEMPLATE,
        ScriptSlot::B => RANDOM_TEMPLATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slot_has_a_template_with_an_entry_point() {
        for slot in [ScriptSlot::A, ScriptSlot::B] {
            assert!(template_for(slot).contains("function decide(self, opponent)"));
        }
        assert_ne!(STRATEGIC_TEMPLATE, RANDOM_TEMPLATE);
    }
}
