//! Identifiers used throughout RecMatch.
//!
//! Accounts use UUIDs. Bids are content-addressed: a [`BidId`] is a SHA-256
//! digest over the bid's identity tuple, so no counter is ever stored.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::constants;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Identity of a bidder or liquidity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RecoveryEpoch
// ---------------------------------------------------------------------------

/// Per-account counter owned by the recoverable token.
///
/// It changes whenever the account's recovery eligibility changes, so a bid
/// that commits to an epoch goes stale the moment the seller's risk profile
/// moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RecoveryEpoch(pub u64);

impl RecoveryEpoch {
    /// The following epoch, or `None` once the counter is exhausted.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for RecoveryEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SequenceNumber
// ---------------------------------------------------------------------------

/// Ledger position at which a bid was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SequenceNumber(pub u64);

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BidId
// ---------------------------------------------------------------------------

/// Content-addressed bid handle: SHA-256 over the bid's identity tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BidId(pub [u8; 32]);

impl BidId {
    /// Derive the id for `(bidder, epoch, amount, sequence)`.
    ///
    /// Encoding, every field fixed-width so boundaries cannot shift:
    ///
    /// ```text
    /// "recmatch:bid_id:v1:" || bidder (16, UUID bytes)
    ///                       || epoch (8, u64 BE)
    ///                       || amount (16, Decimal::serialize of normalized value)
    ///                       || sequence (8, u64 BE)
    /// ```
    ///
    /// Amounts are normalized so `1000` and `1000.00` address the same bid.
    #[must_use]
    pub fn compute(
        bidder: AccountId,
        epoch: RecoveryEpoch,
        amount: Decimal,
        sequence: SequenceNumber,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(constants::BID_ID_DOMAIN);
        hasher.update(bidder.as_bytes());
        hasher.update(epoch.0.to_be_bytes());
        hasher.update(amount.normalize().serialize());
        hasher.update(sequence.0.to_be_bytes());
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First four bytes, hex encoded. For log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for BidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bid:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
