//! System-wide constants for RecMatch.

/// Domain tag prefixed to every bid-id preimage.
pub const BID_ID_DOMAIN: &[u8] = b"recmatch:bid_id:v1:";

/// Default width of one ledger slot in milliseconds. `SystemClock` derives
/// sequence numbers as `unix_ms / interval`.
pub const DEFAULT_SEQUENCE_INTERVAL_MS: u64 = 1000;

/// Whether `post_bid` requires the caller to be the bidder by default.
pub const DEFAULT_REQUIRE_SELF_POST: bool = true;

/// Whether a liquidity provider may match their own bid by default.
pub const DEFAULT_ALLOW_SELF_MATCH: bool = false;
