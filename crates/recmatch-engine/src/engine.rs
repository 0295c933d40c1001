//! The matching engine: bid lifecycle and atomic dual-asset settlement.
//!
//! ## Flow
//!
//! ```text
//! post_bid   → read epoch → BidId::compute → registry.upsert → BidPosted
//! cancel_bid → BidId::compute → registry.remove → BidCancelled
//! match_bid  → BidId::compute → validate (active, epoch, quote, expiry)
//!            → checkpoint bidder and lp → recoverable leg → settlement leg
//!            → registry.remove → Exchanged
//! ```
//!
//! Every check that can be made locally runs before the first transfer. If
//! either leg fails, both ledgers are rolled back to their checkpoints, the
//! registry is left as it was, and nothing is emitted. A zero quote (only
//! possible against a zero minimum) skips the settlement leg.
//!
//! The engine assumes it is driven by one caller at a time (`&mut self`).
//! Use [`SharedEngine`](crate::SharedEngine) to share it across threads.

use chrono::{DateTime, Duration, Utc};
use recmatch_registry::{BidRegistry, EventLog, Notifier};
use recmatch_types::{
    AccountId, BidCancelled, BidEvent, BidId, BidPosted, BidRecord, EngineConfig, Exchanged,
    LedgerClock, RecmatchError, RecoverableToken, RecoveryEpoch, Result, SequenceNumber,
    SettlementAsset, TransferLeg,
};
use rust_decimal::Decimal;

use crate::clock::SystemClock;

/// Derive the content-addressed id of a bid. Pure.
#[must_use]
pub fn compute_bid_id(
    bidder: AccountId,
    epoch: RecoveryEpoch,
    amount: Decimal,
    sequence: SequenceNumber,
) -> BidId {
    BidId::compute(bidder, epoch, amount, sequence)
}

/// Bid registry plus the collaborators a match needs.
pub struct MatchingEngine<R, S, C = SystemClock, N = EventLog> {
    config: EngineConfig,
    registry: BidRegistry,
    recoverable: R,
    settlement: S,
    clock: C,
    notifier: N,
}

impl<R, S, C, N> MatchingEngine<R, S, C, N>
where
    R: RecoverableToken,
    S: SettlementAsset,
    C: LedgerClock,
    N: Notifier,
{
    /// Build an engine with an empty registry.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` fails validation.
    pub fn new(
        config: EngineConfig,
        recoverable: R,
        settlement: S,
        clock: C,
        notifier: N,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry: BidRegistry::new(),
            recoverable,
            settlement,
            clock,
            notifier,
        })
    }

    /// Post (or re-post) a bid to sell `amount` of the bidder's recoverable
    /// token for at least `min_quote` of the settlement asset.
    ///
    /// The id commits to the bidder's recovery epoch and the current
    /// sequence number. Re-posting the same tuple replaces the terms.
    ///
    /// # Errors
    /// - `Unauthorized` if self-posting is required and `caller != bidder`
    /// - `InvalidExpiration` if `expiration <= now` or beyond the lifetime cap
    /// - `InvalidAmount` if `amount <= 0` or `min_quote < 0`
    /// - `BidRetired` if the derived id was already cancelled or matched
    pub fn post_bid(
        &mut self,
        caller: AccountId,
        bidder: AccountId,
        amount: Decimal,
        min_quote: Decimal,
        expiration: DateTime<Utc>,
    ) -> Result<BidId> {
        if self.config.require_self_post && caller != bidder {
            return Err(RecmatchError::Unauthorized { caller, bidder });
        }
        self.check_expiration(expiration)?;
        if amount <= Decimal::ZERO {
            return Err(RecmatchError::InvalidAmount {
                reason: format!("bid amount {amount} must be positive"),
            });
        }
        if min_quote < Decimal::ZERO {
            return Err(RecmatchError::InvalidAmount {
                reason: format!("min quote {min_quote} must not be negative"),
            });
        }

        let epoch = self.recoverable.current_recovery_epoch(bidder)?;
        let sequence = self.clock.sequence();
        let id = compute_bid_id(bidder, epoch, amount, sequence);

        self.registry.prune_retired(sequence);
        let replaced = self
            .registry
            .upsert(id, BidRecord::new(expiration, min_quote))?;
        tracing::debug!(bid = %id, replaced = replaced.is_some(), "Bid stored");

        self.emit(
            BidPosted {
                bidder,
                epoch,
                amount,
                min_quote,
                expiration,
                sequence,
                id,
            }
            .into(),
        );
        Ok(id)
    }

    /// Withdraw the caller's own bid.
    ///
    /// # Errors
    /// Returns `BidNotFound` if no active bid matches the tuple.
    pub fn cancel_bid(
        &mut self,
        caller: AccountId,
        epoch: RecoveryEpoch,
        amount: Decimal,
        sequence: SequenceNumber,
    ) -> Result<()> {
        let id = compute_bid_id(caller, epoch, amount, sequence);
        self.registry.remove(id, sequence)?;
        self.emit(BidCancelled { id }.into());
        Ok(())
    }

    /// Fill a resting bid as liquidity provider `lp`.
    ///
    /// `amount` of recoverable token moves bidder → lp, flagged as still
    /// recoverable at the new holder; `quote` of settlement asset moves
    /// lp → bidder. Both or neither.
    ///
    /// The match succeeds iff the bid is active, the bidder's live epoch is
    /// `epoch`, `quote >= min_quote` and `now < expiration`. With the default
    /// config one more condition applies: `lp != bidder`
    /// (see [`EngineConfig::allow_self_match`]).
    ///
    /// # Errors
    /// - `BidNotFound` if the bid is not active
    /// - `EpochMismatch` if the bidder's live epoch differs from `epoch`
    /// - `QuoteTooLow` if `quote < min_quote`
    /// - `BidExpired` if `now >= expiration`
    /// - `SelfMatch` if `lp == bidder` and self-matching is disabled
    /// - `TransferFailed` if either leg fails (nothing is applied)
    pub fn match_bid(
        &mut self,
        lp: AccountId,
        bidder: AccountId,
        epoch: RecoveryEpoch,
        amount: Decimal,
        quote: Decimal,
        sequence: SequenceNumber,
    ) -> Result<()> {
        let id = compute_bid_id(bidder, epoch, amount, sequence);
        let record = self.registry.require_active(id)?;

        let live = self.recoverable.current_recovery_epoch(bidder)?;
        if live != epoch {
            tracing::warn!(bid = %id, expected = epoch.0, live = live.0, "Match rejected: stale epoch");
            return Err(RecmatchError::EpochMismatch {
                expected: epoch,
                live,
            });
        }
        if !record.accepts(quote) {
            return Err(RecmatchError::QuoteTooLow {
                quote,
                min_quote: record.min_quote,
            });
        }
        if record.is_expired_at(self.clock.now()) {
            return Err(RecmatchError::BidExpired {
                id,
                expiration: record.expiration,
            });
        }
        if lp == bidder && !self.config.allow_self_match {
            return Err(RecmatchError::SelfMatch(lp));
        }

        self.settle(bidder, lp, amount, quote)?;
        self.registry.remove(id, sequence)?;

        self.emit(
            Exchanged {
                bidder,
                lp,
                amount,
                quote,
                id,
            }
            .into(),
        );
        Ok(())
    }

    /// The active terms at `id`, if any.
    #[must_use]
    pub fn lookup(&self, id: &BidId) -> Option<BidRecord> {
        self.registry.lookup(id)
    }

    /// Run both legs as one unit, restoring both ledgers on any failure.
    fn settle(
        &mut self,
        bidder: AccountId,
        lp: AccountId,
        amount: Decimal,
        quote: Decimal,
    ) -> Result<()> {
        let touched = [bidder, lp];
        let recoverable_cp = self.recoverable.checkpoint(&touched);
        let settlement_cp = self.settlement.checkpoint(&touched);

        if let Err(err) = self
            .recoverable
            .transfer_recoverable(bidder, lp, amount, true)
        {
            self.recoverable.rollback(recoverable_cp);
            tracing::warn!(%bidder, %lp, %err, "Recoverable leg failed, match aborted");
            return Err(RecmatchError::transfer_failed(
                TransferLeg::Recoverable,
                &err,
            ));
        }

        if quote.is_zero() {
            tracing::debug!(%bidder, %lp, "Zero quote, settlement leg skipped");
            return Ok(());
        }
        if let Err(err) = self.settlement.transfer_from(lp, bidder, quote) {
            self.settlement.rollback(settlement_cp);
            self.recoverable.rollback(recoverable_cp);
            tracing::warn!(%bidder, %lp, %err, "Settlement leg failed, recoverable leg rolled back");
            return Err(RecmatchError::transfer_failed(
                TransferLeg::Settlement,
                &err,
            ));
        }
        Ok(())
    }

    fn check_expiration(&self, expiration: DateTime<Utc>) -> Result<()> {
        let now = self.clock.now();
        let too_far = self.config.max_bid_lifetime_secs.is_some_and(|secs| {
            i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .is_some_and(|max| expiration - now > max)
        });
        if expiration <= now || too_far {
            return Err(RecmatchError::InvalidExpiration { expiration, now });
        }
        Ok(())
    }

    fn emit(&mut self, event: BidEvent) {
        tracing::info!(kind = %event, bid = %event.bid_id(), "Bid transition");
        self.notifier.notify(&event);
    }
}

impl<R, S, N> MatchingEngine<R, S, SystemClock, N>
where
    R: RecoverableToken,
    S: SettlementAsset,
    N: Notifier,
{
    /// Build an engine on wall-clock time, with ledger slots of
    /// `config.sequence_interval_ms`.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` fails validation.
    pub fn with_system_clock(
        config: EngineConfig,
        recoverable: R,
        settlement: S,
        notifier: N,
    ) -> Result<Self> {
        let clock = SystemClock::from_config(&config);
        Self::new(config, recoverable, settlement, clock, notifier)
    }
}

impl<R, S, C, N> MatchingEngine<R, S, C, N> {
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &BidRegistry {
        &self.registry
    }

    #[must_use]
    pub fn recoverable(&self) -> &R {
        &self.recoverable
    }

    /// Mutable access to the recoverable token, e.g. to move an epoch.
    pub fn recoverable_mut(&mut self) -> &mut R {
        &mut self.recoverable
    }

    #[must_use]
    pub fn settlement(&self) -> &S {
        &self.settlement
    }

    pub fn settlement_mut(&mut self) -> &mut S {
        &mut self.settlement
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}
