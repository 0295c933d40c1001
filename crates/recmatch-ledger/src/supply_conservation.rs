//! Supply conservation invariant checker.
//!
//! Invariant enforced by both reference ledgers:
//! ```text
//! Σ(balances) == Σ(mints) - Σ(burns)
//! ```
//!
//! Transfers, matches, and rollbacks only move value between accounts, so
//! any drift means a ledger created or destroyed tokens.

use recmatch_types::{RecmatchError, Result};
use rust_decimal::Decimal;

/// Tracks the issued supply of one asset.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    minted: Decimal,
    burned: Decimal,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mint(&mut self, amount: Decimal) {
        self.minted += amount;
    }

    pub fn record_burn(&mut self, amount: Decimal) {
        self.burned += amount;
    }

    /// Expected total supply: mints - burns.
    #[must_use]
    pub fn expected_supply(&self) -> Decimal {
        self.minted - self.burned
    }

    /// Verify that the sum of all balances matches the issued supply.
    ///
    /// # Errors
    /// Returns [`RecmatchError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, asset: &str, actual_supply: Decimal) -> Result<()> {
        let expected = self.expected_supply();
        if actual_supply != expected {
            tracing::error!(asset, %actual_supply, %expected, "Supply invariant violated");
            return Err(RecmatchError::SupplyInvariantViolation {
                reason: format!(
                    "{asset}: actual supply {actual_supply} != expected {expected} \
                     (minted={}, burned={})",
                    self.minted, self.burned,
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_minted(&self) -> Decimal {
        self.minted
    }

    #[must_use]
    pub fn total_burned(&self) -> Decimal {
        self.burned
    }
}
