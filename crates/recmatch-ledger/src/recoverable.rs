//! In-memory recoverable-token ledger.
//!
//! Tracks per-account holdings split into settled and at-risk parts, plus the
//! per-account recovery epoch. The recovery mechanism itself (reversing
//! at-risk transfers) is not modelled; only the state the matching engine
//! reads and the transfer it requests.

use std::collections::HashMap;

use recmatch_types::{
    AccountId, HoldingEntry, Journaled, RecmatchError, RecoverableToken, RecoveryEpoch, Result,
};
use rust_decimal::Decimal;

use crate::supply_conservation::SupplyConservation;

/// Asset label used in supply-check messages.
const ASSET: &str = "recoverable";

/// Reference implementation of [`RecoverableToken`].
///
/// All mutations are atomic: either the full operation succeeds or the
/// ledger is unchanged.
pub struct RecoverableLedger {
    holdings: HashMap<AccountId, HoldingEntry>,
    epochs: HashMap<AccountId, RecoveryEpoch>,
    supply: SupplyConservation,
}

/// Prior holdings of the accounts a mutation is about to touch.
///
/// `None` means the account had no entry. Epochs are not journaled: no
/// transfer moves them.
#[derive(Debug, Clone)]
pub struct RecoverableCheckpoint {
    holdings: Vec<(AccountId, Option<HoldingEntry>)>,
}

impl RecoverableLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            holdings: HashMap::new(),
            epochs: HashMap::new(),
            supply: SupplyConservation::new(),
        }
    }

    /// Issue `amount` to `account`. `at_risk` decides which bucket it lands in.
    pub fn mint(&mut self, account: AccountId, amount: Decimal, at_risk: bool) {
        let entry = self.holdings.entry(account).or_default();
        if at_risk {
            entry.at_risk += amount;
        } else {
            entry.settled += amount;
        }
        self.supply.record_mint(amount);
    }

    /// The account's holding, zero if unknown.
    #[must_use]
    pub fn holding(&self, account: AccountId) -> HoldingEntry {
        self.holdings.get(&account).cloned().unwrap_or_default()
    }

    /// Total balance (settled + at risk).
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Decimal {
        self.holding(account).total()
    }

    /// Current recovery epoch; accounts start at zero.
    #[must_use]
    pub fn recovery_epoch(&self, account: AccountId) -> RecoveryEpoch {
        self.epochs.get(&account).copied().unwrap_or(RecoveryEpoch(0))
    }

    /// Record a change in the account's recovery eligibility.
    ///
    /// # Errors
    /// Returns `Internal` if the epoch counter is exhausted.
    pub fn bump_recovery_epoch(&mut self, account: AccountId) -> Result<RecoveryEpoch> {
        let current = self.recovery_epoch(account);
        let next = current.next().ok_or_else(|| {
            RecmatchError::Internal(format!("recovery epoch of {account} exhausted at {current}"))
        })?;
        self.epochs.insert(account, next);
        tracing::debug!(%account, epoch = next.0, "Recovery epoch advanced");
        Ok(next)
    }

    pub fn set_recovery_epoch(&mut self, account: AccountId, epoch: RecoveryEpoch) {
        self.epochs.insert(account, epoch);
    }

    /// Sum of all holdings.
    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.holdings.values().map(HoldingEntry::total).sum()
    }

    /// Verify Σ holdings == Σ mints.
    pub fn verify_supply(&self) -> Result<()> {
        self.supply.verify(ASSET, self.total_supply())
    }
}

impl Default for RecoverableLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Journaled for RecoverableLedger {
    type Checkpoint = RecoverableCheckpoint;

    fn checkpoint(&self, accounts: &[AccountId]) -> Self::Checkpoint {
        RecoverableCheckpoint {
            holdings: accounts
                .iter()
                .map(|a| (*a, self.holdings.get(a).cloned()))
                .collect(),
        }
    }

    fn rollback(&mut self, checkpoint: Self::Checkpoint) {
        // Restore in reverse so a repeated account ends at its first snapshot.
        for (account, prior) in checkpoint.holdings.into_iter().rev() {
            match prior {
                Some(entry) => self.holdings.insert(account, entry),
                None => self.holdings.remove(&account),
            };
        }
    }
}

impl RecoverableToken for RecoverableLedger {
    fn current_recovery_epoch(&self, account: AccountId) -> Result<RecoveryEpoch> {
        Ok(self.recovery_epoch(account))
    }

    fn transfer_recoverable(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        flagged: bool,
    ) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(RecmatchError::InvalidAmount {
                reason: format!("transfer amount {amount} must be positive"),
            });
        }

        let source = self
            .holdings
            .get_mut(&from)
            .ok_or(RecmatchError::InsufficientBalance {
                needed: amount,
                available: Decimal::ZERO,
            })?;
        let available = source.total();
        if !source.debit(amount) {
            return Err(RecmatchError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        let dest = self.holdings.entry(to).or_default();
        if flagged {
            dest.at_risk += amount;
        } else {
            dest.settled += amount;
        }

        tracing::debug!(%from, %to, %amount, flagged, "Recoverable transfer");
        Ok(())
    }
}
