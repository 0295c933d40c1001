//! Notifications emitted on successful bid transitions.
//!
//! Each event carries every field an off-core indexer needs to rebuild the
//! book: replaying `BidPosted` / `BidCancelled` / `Exchanged` in order
//! reproduces the registry.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, BidId, RecoveryEpoch, SequenceNumber};

/// A bid was created, or its terms replaced in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidPosted {
    pub bidder: AccountId,
    pub epoch: RecoveryEpoch,
    pub amount: Decimal,
    pub min_quote: Decimal,
    pub expiration: DateTime<Utc>,
    pub sequence: SequenceNumber,
    pub id: BidId,
}

/// The bidder withdrew a resting bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidCancelled {
    pub id: BidId,
}

/// A liquidity provider matched a bid and both legs settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchanged {
    pub bidder: AccountId,
    pub lp: AccountId,
    pub amount: Decimal,
    pub quote: Decimal,
    pub id: BidId,
}

/// Any notification the engine emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BidEvent {
    BidPosted(BidPosted),
    BidCancelled(BidCancelled),
    Exchanged(Exchanged),
}

impl BidEvent {
    /// The bid this event concerns.
    #[must_use]
    pub fn bid_id(&self) -> BidId {
        match self {
            Self::BidPosted(e) => e.id,
            Self::BidCancelled(e) => e.id,
            Self::Exchanged(e) => e.id,
        }
    }
}

impl std::fmt::Display for BidEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BidPosted(_) => write!(f, "BID_POSTED"),
            Self::BidCancelled(_) => write!(f, "BID_CANCELLED"),
            Self::Exchanged(_) => write!(f, "EXCHANGED"),
        }
    }
}

impl From<BidPosted> for BidEvent {
    fn from(e: BidPosted) -> Self {
        Self::BidPosted(e)
    }
}

impl From<BidCancelled> for BidEvent {
    fn from(e: BidCancelled) -> Self {
        Self::BidCancelled(e)
    }
}

impl From<Exchanged> for BidEvent {
    fn from(e: Exchanged) -> Self {
        Self::Exchanged(e)
    }
}
