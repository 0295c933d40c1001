//! # recmatch-engine
//!
//! **Bid lifecycle and atomic matching** for recoverable tokens.
//!
//! Holders of recoverable tokens post bids to sell at-risk holdings for a
//! non-reversible settlement asset at a minimum quote. Liquidity providers
//! match them. A match only goes through if the seller's recovery epoch is
//! the one the bid committed to, and both asset legs settle together or not
//! at all.
//!
//! - [`MatchingEngine`]: `post_bid`, `cancel_bid`, `match_bid`, `lookup`
//! - [`compute_bid_id`]: the pure id derivation
//! - [`SharedEngine`]: mutex-guarded handle for multi-threaded hosts
//! - [`SystemClock`] / [`ManualClock`]: time and sequence sources
//! - [`telemetry::init_tracing`]: subscriber bootstrap

pub mod clock;
pub mod engine;
pub mod shared;
pub mod telemetry;

pub use clock::{ManualClock, SystemClock};
pub use engine::{MatchingEngine, compute_bid_id};
pub use shared::SharedEngine;
