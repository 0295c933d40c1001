//! # recmatch-registry
//!
//! **Bid storage and notification**: the content-addressed registry of
//! resting bids and the sinks that observe its transitions.
//!
//! ## Architecture
//!
//! 1. **BidRegistry**: `BidId → BidRecord`, absent keys read as the sentinel
//! 2. **Notifier**: receives `BidPosted` / `BidCancelled` / `Exchanged`
//! 3. **EventLog**: in-memory notifier that can replay itself into a book
//! 4. **TracingNotifier**: structured log line per event
//!
//! The registry never talks to a ledger; the engine drives it.

pub mod notifier;
pub mod registry;

pub use notifier::{EventLog, Notifier, TracingNotifier};
pub use registry::BidRegistry;
