//! Operation budget for one host call.
//!
//! Evaluating a node costs one unit. Conversions and array helpers also pay
//! for the elements they visit and the bytes they copy, so no single
//! operation can do unbounded work for a constant price.

use crate::error::{Result, ScriptError};

/// String bytes copied, compared or scanned per budget unit.
const BYTES_PER_UNIT: usize = 64;

#[derive(Clone, Copy, Debug)]
pub struct Meter {
    budget: u64,
    remaining: u64,
}

impl Meter {
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            remaining: budget,
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.budget;
    }

    /// Units consumed since the last reset.
    pub fn used(&self) -> u64 {
        self.budget - self.remaining
    }

    pub fn charge(&mut self, units: u64) -> Result<()> {
        if units > self.remaining {
            self.remaining = 0;
            return Err(ScriptError::BudgetExceeded(self.budget));
        }
        self.remaining -= units;
        Ok(())
    }

    /// One unit per element touched.
    pub fn charge_items(&mut self, count: usize) -> Result<()> {
        self.charge(u64::try_from(count).unwrap_or(u64::MAX))
    }

    pub fn charge_bytes(&mut self, len: usize) -> Result<()> {
        self.charge_items(len / BYTES_PER_UNIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overdraft_empties_the_meter() {
        let mut meter = Meter::new(10);
        meter.charge(4).unwrap();
        assert_eq!(meter.used(), 4);
        assert_eq!(meter.charge(7), Err(ScriptError::BudgetExceeded(10)));
        assert_eq!(meter.used(), 10);
        assert!(meter.charge(1).is_err());

        meter.reset();
        meter.charge_bytes(63).unwrap();
        assert_eq!(meter.used(), 0);
        meter.charge_bytes(640).unwrap();
        assert_eq!(meter.used(), 10);
    }
}
