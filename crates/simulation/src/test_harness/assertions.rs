//! Assertion helpers for `TestMarket` integration tests.

use crate::housing::OwnerType;
use crate::market_config::ConfigError;
use crate::runner::CommandOutcome;

use super::TestMarket;

impl TestMarket {
    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    pub fn assert_year(&self, expected: u32) {
        let year = self.year();
        assert_eq!(year, expected, "Expected year {expected}, got {year}");
    }

    pub fn assert_total_units(&self, expected: usize) {
        let total = self.market().stock().len();
        assert_eq!(total, expected, "Expected {expected} units, got {total}");
    }

    /// Assert the number of units held by `owner`.
    pub fn assert_owner_count(&self, owner: OwnerType, expected: usize) {
        let count = self.market().stock().count_owner(owner);
        assert_eq!(
            count,
            expected,
            "Expected {expected} {} units, got {count}",
            owner.name()
        );
    }

    /// Assert every unit is owned and priced.
    pub fn assert_invariants(&self) {
        if let Err(e) = self.market().check_invariants() {
            panic!("market invariants violated: {e}");
        }
    }

    /// Assert the most recent command was rejected with `expected`.
    pub fn assert_last_command_rejected(&self, expected: ConfigError) {
        match self.command_log().last_outcome() {
            Some(CommandOutcome::Rejected(e)) => assert_eq!(*e, expected),
            other => panic!("Expected rejection {expected:?}, got {other:?}"),
        }
    }

    pub fn assert_last_command_applied(&self) {
        let outcome = self.command_log().last_outcome();
        assert_eq!(
            outcome,
            Some(&CommandOutcome::Applied),
            "Expected last command to apply, got {outcome:?}"
        );
    }
}
