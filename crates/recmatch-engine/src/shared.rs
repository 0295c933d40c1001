//! Thread-safe handle around a [`MatchingEngine`].
//!
//! The engine's check-then-act sequence (read epoch, validate, transfer,
//! delete) is only sound when nothing else touches the registry or the
//! ledgers in between. `SharedEngine` holds one mutex for the whole engine,
//! so each operation is a single critical section.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use recmatch_registry::Notifier;
use recmatch_types::{
    AccountId, BidId, BidRecord, LedgerClock, RecmatchError, RecoverableToken, RecoveryEpoch,
    Result, SequenceNumber, SettlementAsset,
};
use rust_decimal::Decimal;

use crate::engine::MatchingEngine;

/// Cloneable, lock-guarded engine handle.
pub struct SharedEngine<R, S, C, N> {
    inner: Arc<Mutex<MatchingEngine<R, S, C, N>>>,
}

impl<R, S, C, N> Clone for SharedEngine<R, S, C, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R, S, C, N> SharedEngine<R, S, C, N>
where
    R: RecoverableToken,
    S: SettlementAsset,
    C: LedgerClock,
    N: Notifier,
{
    #[must_use]
    pub fn new(engine: MatchingEngine<R, S, C, N>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MatchingEngine<R, S, C, N>>> {
        self.inner
            .lock()
            .map_err(|_| RecmatchError::Internal("engine lock poisoned".into()))
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<T>(&self, f: impl FnOnce(&mut MatchingEngine<R, S, C, N>) -> T) -> Result<T> {
        let mut engine = self.lock()?;
        Ok(f(&mut *engine))
    }

    pub fn post_bid(
        &self,
        caller: AccountId,
        bidder: AccountId,
        amount: Decimal,
        min_quote: Decimal,
        expiration: DateTime<Utc>,
    ) -> Result<BidId> {
        self.lock()?
            .post_bid(caller, bidder, amount, min_quote, expiration)
    }

    pub fn cancel_bid(
        &self,
        caller: AccountId,
        epoch: RecoveryEpoch,
        amount: Decimal,
        sequence: SequenceNumber,
    ) -> Result<()> {
        self.lock()?.cancel_bid(caller, epoch, amount, sequence)
    }

    pub fn match_bid(
        &self,
        lp: AccountId,
        bidder: AccountId,
        epoch: RecoveryEpoch,
        amount: Decimal,
        quote: Decimal,
        sequence: SequenceNumber,
    ) -> Result<()> {
        self.lock()?
            .match_bid(lp, bidder, epoch, amount, quote, sequence)
    }

    pub fn lookup(&self, id: &BidId) -> Result<Option<BidRecord>> {
        Ok(self.lock()?.lookup(id))
    }
}
