//! Balance tracking types for the reference ledgers.
//!
//! A recoverable-token holding is split into a `settled` part (past any
//! recovery window) and an `at_risk` part (received through a flagged
//! transfer, still reversible). Settlement-asset balances are plain amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single recoverable-token holding for one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoldingEntry {
    /// Holdings no longer subject to recovery.
    pub settled: Decimal,
    /// Holdings still inside the recovery window.
    pub at_risk: Decimal,
}

impl HoldingEntry {
    /// Create a zero holding.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settled: Decimal::ZERO,
            at_risk: Decimal::ZERO,
        }
    }

    /// Total holding (settled + at risk).
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.settled + self.at_risk
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.settled.is_zero() && self.at_risk.is_zero()
    }

    /// Remove `amount`, drawing on `at_risk` first.
    ///
    /// Leaves the entry untouched and returns `false` if the total is short.
    pub fn debit(&mut self, amount: Decimal) -> bool {
        if self.total() < amount {
            return false;
        }
        let from_risk = self.at_risk.min(amount);
        self.at_risk -= from_risk;
        self.settled -= amount - from_risk;
        true
    }
}

impl Default for HoldingEntry {
    fn default() -> Self {
        Self::new()
    }
}
