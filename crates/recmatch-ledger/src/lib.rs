//! # recmatch-ledger
//!
//! **Reference collaborators**: in-memory implementations of the two asset
//! ports the matching engine consumes.
//!
//! ## Architecture
//!
//! 1. **RecoverableLedger**: holdings split into settled / at-risk, plus the
//!    per-account recovery epoch
//! 2. **SettlementLedger**: plain balances with exchange allowances
//! 3. **SupplyConservation**: Σ balances == Σ mints - Σ burns
//!
//! Both ledgers implement `Journaled`, so the engine can checkpoint them
//! before a match and roll back if either leg fails.

pub mod recoverable;
pub mod settlement;
pub mod supply_conservation;

pub use recoverable::{RecoverableCheckpoint, RecoverableLedger};
pub use settlement::{SettlementCheckpoint, SettlementLedger};
pub use supply_conservation::SupplyConservation;
