//! # recmatch-types
//!
//! Shared types, errors, and configuration for the **RecMatch** engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`BidId`], [`RecoveryEpoch`], [`SequenceNumber`]
//! - **Bid model**: [`BidRecord`] with its [`BidRecord::EMPTY`] sentinel
//! - **Events**: [`BidEvent`], [`BidPosted`], [`BidCancelled`], [`Exchanged`]
//! - **Balances**: [`HoldingEntry`]
//! - **Ports**: [`RecoverableToken`], [`SettlementAsset`], [`LedgerClock`], [`Journaled`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`RecmatchError`] with `RM_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod balance;
pub mod bid;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod ports;

// Re-export all primary types at crate root for ergonomic imports:
//   use recmatch_types::{BidId, BidRecord, RecmatchError, ...};

pub use balance::*;
pub use bid::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use ports::*;

// Constants are accessed via `recmatch_types::constants::FOO`
// (not re-exported to avoid name collisions).
