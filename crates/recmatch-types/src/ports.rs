//! Collaborator ports consumed by the matching engine.
//!
//! The recoverable token and the settlement asset live outside the core.
//! The engine only ever reads the seller's recovery epoch and requests two
//! transfers; everything else about those assets is the implementor's
//! business.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::{AccountId, RecoveryEpoch, Result, SequenceNumber};

/// State that can be snapshotted before a multi-step mutation and restored
/// if a later step fails.
///
/// `checkpoint` records only the entries of `accounts`; the mutation in
/// between must not touch any other account. `rollback` restores exactly
/// those entries as observed at `checkpoint`.
pub trait Journaled {
    type Checkpoint;

    fn checkpoint(&self, accounts: &[AccountId]) -> Self::Checkpoint;

    fn rollback(&mut self, checkpoint: Self::Checkpoint);
}

/// The recoverable token.
pub trait RecoverableToken: Journaled {
    /// The account's current recovery epoch. Read-only.
    fn current_recovery_epoch(&self, account: AccountId) -> Result<RecoveryEpoch>;

    /// Move `amount` from `from` to `to`. When `flagged`, the receiver holds
    /// it as still subject to the recovery window.
    fn transfer_recoverable(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        flagged: bool,
    ) -> Result<()>;
}

/// The non-reversible settlement asset.
pub trait SettlementAsset: Journaled {
    /// Move `amount` from `from` to `to` on the exchange's authority.
    fn transfer_from(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()>;
}

/// Source of the current time and ledger position.
pub trait LedgerClock {
    fn now(&self) -> DateTime<Utc>;

    fn sequence(&self) -> SequenceNumber;
}
