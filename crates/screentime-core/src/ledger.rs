//! Screen-time reward ledger.
//!
//! Completing a task credits its duration; a recurring tick drains the
//! allowance into `used`. The allowance is clamped at zero, and `used` only
//! grows by what was actually drained, so `allowance + used` only changes
//! through credits.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardLedger {
    allowance_secs: f64,
    used_secs: f64,
}

impl RewardLedger {
    /// Four hours.
    pub const DEFAULT_ALLOWANCE_SECS: f64 = 4.0 * 60.0 * 60.0;

    pub fn new(initial_allowance_secs: f64) -> Self {
        Self::from_parts(initial_allowance_secs, 0.0)
    }

    /// Restore a ledger from persisted values.
    pub fn from_parts(allowance_secs: f64, used_secs: f64) -> Self {
        Self {
            allowance_secs: non_negative(allowance_secs),
            used_secs: non_negative(used_secs),
        }
    }

    pub fn allowance_secs(&self) -> f64 {
        self.allowance_secs
    }

    pub fn used_secs(&self) -> f64 {
        self.used_secs
    }

    pub fn is_exhausted(&self) -> bool {
        self.allowance_secs <= 0.0
    }

    /// Adds `duration_secs` to the allowance, saturating at `f64::MAX` so
    /// the ledger always stays finite.
    ///
    /// Returns the new allowance.
    pub fn credit(&mut self, duration_secs: f64) -> f64 {
        self.allowance_secs = (self.allowance_secs + non_negative(duration_secs)).min(f64::MAX);
        self.allowance_secs
    }

    /// Drains one interval. No-op once the allowance is spent.
    ///
    /// Returns the seconds actually deducted.
    pub fn tick(&mut self, interval_secs: f64) -> f64 {
        if self.is_exhausted() {
            return 0.0;
        }
        let deducted = non_negative(interval_secs).min(self.allowance_secs);
        self.allowance_secs -= deducted;
        self.used_secs = (self.used_secs + deducted).min(f64::MAX);
        deducted
    }
}

impl Default for RewardLedger {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALLOWANCE_SECS)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_four_hours() {
        let ledger = RewardLedger::default();
        assert_eq!(ledger.allowance_secs(), 14_400.0);
        assert_eq!(ledger.used_secs(), 0.0);
    }

    #[test]
    fn credit_then_tick() {
        let mut ledger = RewardLedger::new(14_400.0);
        assert_eq!(ledger.credit(1_800.0), 16_200.0);

        assert_eq!(ledger.tick(60.0), 60.0);
        assert_eq!(ledger.allowance_secs(), 16_140.0);
        assert_eq!(ledger.used_secs(), 60.0);
    }

    #[test]
    fn huge_credits_saturate_instead_of_overflowing() {
        let mut ledger = RewardLedger::new(0.0);
        ledger.credit(1e308);
        assert_eq!(ledger.credit(1e308), f64::MAX);
        assert!(ledger.allowance_secs().is_finite());

        assert_eq!(ledger.tick(f64::MAX), f64::MAX);
        ledger.credit(f64::MAX);
        ledger.tick(f64::MAX);
        assert_eq!(ledger.used_secs(), f64::MAX);
    }

    #[test]
    fn boundary_tick_clamps_to_zero() {
        let mut ledger = RewardLedger::new(30.0);
        assert_eq!(ledger.tick(60.0), 30.0);
        assert_eq!(ledger.allowance_secs(), 0.0);
        assert_eq!(ledger.used_secs(), 30.0);
        assert!(ledger.is_exhausted());
    }

    #[test]
    fn tick_on_empty_allowance_is_noop() {
        let mut ledger = RewardLedger::new(0.0);
        assert_eq!(ledger.tick(60.0), 0.0);
        assert_eq!(ledger.used_secs(), 0.0);
    }

    #[test]
    fn negative_inputs_are_ignored() {
        let mut ledger = RewardLedger::from_parts(-5.0, f64::NAN);
        assert_eq!(ledger.allowance_secs(), 0.0);
        assert_eq!(ledger.used_secs(), 0.0);

        ledger.credit(-100.0);
        assert_eq!(ledger.allowance_secs(), 0.0);
    }

    proptest! {
        #[test]
        fn allowance_never_negative(
            start in 0.0f64..20_000.0,
            ops in prop::collection::vec((any::<bool>(), 0.0f64..5_000.0), 0..200),
        ) {
            let mut ledger = RewardLedger::new(start);
            let mut credited = start;
            for (is_credit, amount) in ops {
                if is_credit {
                    ledger.credit(amount);
                    credited += amount;
                } else {
                    ledger.tick(amount);
                }
                prop_assert!(ledger.allowance_secs() >= 0.0);
            }
            let total = ledger.allowance_secs() + ledger.used_secs();
            prop_assert!((total - credited).abs() < 1e-6 * credited.max(1.0));
        }
    }
}
