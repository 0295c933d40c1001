//! Error types for RecMatch.
//!
//! All errors use the `RM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Bid lifecycle errors
//! - 2xx: Transfer / ledger errors
//! - 3xx: Authorization errors
//! - 4xx: Invariant violations
//! - 9xx: General / internal errors

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, BidId, RecoveryEpoch};

/// Which side of a match a transfer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferLeg {
    /// Recoverable token, bidder → liquidity provider.
    Recoverable,
    /// Settlement asset, liquidity provider → bidder.
    Settlement,
}

impl std::fmt::Display for TransferLeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recoverable => write!(f, "RECOVERABLE"),
            Self::Settlement => write!(f, "SETTLEMENT"),
        }
    }
}

/// Central error enum for all RecMatch operations.
#[derive(Debug, Error)]
pub enum RecmatchError {
    // =================================================================
    // Bid Lifecycle (1xx)
    // =================================================================
    /// Expiration is not strictly in the future, or exceeds the configured horizon.
    #[error("RM_ERR_100: Invalid expiration {expiration} (now {now})")]
    InvalidExpiration {
        expiration: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// No active record under this id.
    #[error("RM_ERR_101: Bid not found: {0}")]
    BidNotFound(BidId),

    #[error("RM_ERR_102: Bid {id} expired at {expiration}")]
    BidExpired {
        id: BidId,
        expiration: DateTime<Utc>,
    },

    #[error("RM_ERR_103: Quote too low: offered {quote}, minimum {min_quote}")]
    QuoteTooLow { quote: Decimal, min_quote: Decimal },

    /// The seller's recovery epoch moved since the bid was posted.
    #[error("RM_ERR_104: Recovery epoch mismatch: bid committed to {expected}, live is {live}")]
    EpochMismatch {
        expected: RecoveryEpoch,
        live: RecoveryEpoch,
    },

    #[error("RM_ERR_105: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// The id was destroyed by a cancel or a match and cannot be reused.
    #[error("RM_ERR_106: Bid already retired: {0}")]
    BidRetired(BidId),

    // =================================================================
    // Transfer / Ledger (2xx)
    // =================================================================
    /// One leg of a match failed; the whole match was rolled back.
    #[error("RM_ERR_200: {leg} transfer failed: {reason}")]
    TransferFailed { leg: TransferLeg, reason: String },

    #[error("RM_ERR_201: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    #[error("RM_ERR_202: Insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: Decimal, approved: Decimal },

    // =================================================================
    // Authorization (3xx)
    // =================================================================
    #[error("RM_ERR_300: Caller {caller} may not act for bidder {bidder}")]
    Unauthorized { caller: AccountId, bidder: AccountId },

    #[error("RM_ERR_301: Liquidity provider {0} cannot match their own bid")]
    SelfMatch(AccountId),

    // =================================================================
    // Invariants (4xx)
    // =================================================================
    #[error("RM_ERR_400: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    #[error("RM_ERR_900: Internal error: {0}")]
    Internal(String),

    #[error("RM_ERR_901: Configuration error: {0}")]
    Configuration(String),
}

impl RecmatchError {
    /// Wrap a ledger failure as the given leg of a match.
    #[must_use]
    pub fn transfer_failed(leg: TransferLeg, source: &Self) -> Self {
        Self::TransferFailed {
            leg,
            reason: source.to_string(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, RecmatchError>;

impl From<serde_json::Error> for RecmatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
