//! Resting bid terms.
//!
//! ## State Machine (per [`BidId`](crate::BidId))
//!
//! ```text
//!            post                 cancel / match
//!   ┌────────┐────────▶┌────────┐───────────────▶┌────────┐
//!   │ ABSENT │         │ ACTIVE │                 │ ABSENT │
//!   └────────┘         └───┬────┘                 └────────┘
//!                          │ post (same key): terms replaced
//!                          └──────▶ ACTIVE
//! ```
//!
//! The registry stores a [`BidRecord`] per key. An absent key reads as
//! [`BidRecord::EMPTY`], whose zero expiration marks "no entry".

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The terms of a resting bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    /// The bid can be matched strictly before this instant.
    pub expiration: DateTime<Utc>,
    /// Minimum settlement-asset quote the bidder accepts.
    pub min_quote: Decimal,
}

impl BidRecord {
    /// Reserved sentinel for "no entry": zero expiration, zero quote.
    pub const EMPTY: Self = Self {
        expiration: DateTime::<Utc>::UNIX_EPOCH,
        min_quote: Decimal::ZERO,
    };

    #[must_use]
    pub fn new(expiration: DateTime<Utc>, min_quote: Decimal) -> Self {
        Self {
            expiration,
            min_quote,
        }
    }

    /// A record is active iff its expiration is non-zero.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.expiration != DateTime::<Utc>::UNIX_EPOCH
    }

    /// Whether the bid can no longer be matched at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration
    }

    /// Whether `quote` satisfies the bidder's minimum.
    #[must_use]
    pub fn accepts(&self, quote: Decimal) -> bool {
        quote >= self.min_quote
    }
}

impl Default for BidRecord {
    fn default() -> Self {
        Self::EMPTY
    }
}
