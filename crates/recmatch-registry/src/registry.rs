//! Bid registry: content-addressed store of resting bid terms.
//!
//! Keys are [`BidId`]s derived from the bid's identity tuple; values are
//! [`BidRecord`]s. A missing key reads as [`BidRecord::EMPTY`]. Removing a
//! record retires its id: a retired id can never be posted again.
//!
//! Retired ids are remembered together with the sequence number they were
//! posted at. Posting always derives ids from the current sequence, so once
//! the ledger has moved past a slot no id from that slot can be derived
//! again and its retired entries are dropped by [`BidRegistry::prune_retired`].
//! Sequence numbers must not go backwards.

use std::collections::HashMap;

use recmatch_types::{BidId, BidRecord, RecmatchError, Result, SequenceNumber};

/// Key-value store of active bids.
///
/// Every mutation touches exactly one key and either fully applies or
/// leaves the registry unchanged.
pub struct BidRegistry {
    /// Active records indexed by id.
    records: HashMap<BidId, BidRecord>,
    /// Ids destroyed by cancel or match, with the slot they were posted in.
    retired: HashMap<BidId, SequenceNumber>,
    /// Sequence of the last prune; nothing below it is retained.
    pruned_below: SequenceNumber,
}

impl BidRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            retired: HashMap::new(),
            pruned_below: SequenceNumber(0),
        }
    }

    /// Insert or replace the terms stored at `id`.
    ///
    /// Returns the previous terms when this replaced an active record.
    ///
    /// # Errors
    /// - `BidRetired` if `id` was already cancelled or matched
    /// - `Internal` if `record` is the inactive sentinel
    pub fn upsert(&mut self, id: BidId, record: BidRecord) -> Result<Option<BidRecord>> {
        if self.retired.contains_key(&id) {
            return Err(RecmatchError::BidRetired(id));
        }
        if !record.is_active() {
            return Err(RecmatchError::Internal(format!(
                "refusing to store inactive record at {id}"
            )));
        }
        Ok(self.records.insert(id, record))
    }

    /// Delete the record at `id` and retire the id. `sequence` is the slot
    /// the bid was posted in.
    ///
    /// # Errors
    /// Returns `BidNotFound` if there is no active record at `id`.
    pub fn remove(&mut self, id: BidId, sequence: SequenceNumber) -> Result<BidRecord> {
        let record = self
            .records
            .remove(&id)
            .ok_or(RecmatchError::BidNotFound(id))?;
        if sequence >= self.pruned_below {
            self.retired.insert(id, sequence);
        }
        Ok(record)
    }

    /// Forget retired ids posted before `current`. Returns how many were
    /// dropped. Runs at most once per slot.
    pub fn prune_retired(&mut self, current: SequenceNumber) -> usize {
        if current <= self.pruned_below {
            return 0;
        }
        self.pruned_below = current;
        let before = self.retired.len();
        self.retired.retain(|_, posted| *posted >= current);
        let dropped = before - self.retired.len();
        if dropped > 0 {
            tracing::debug!(dropped, below = current.0, "Pruned retired bid ids");
        }
        dropped
    }

    /// The record at `id`, or the [`BidRecord::EMPTY`] sentinel.
    #[must_use]
    pub fn get(&self, id: &BidId) -> BidRecord {
        self.records.get(id).copied().unwrap_or(BidRecord::EMPTY)
    }

    /// The active record at `id`, if any.
    #[must_use]
    pub fn lookup(&self, id: &BidId) -> Option<BidRecord> {
        Some(self.get(id)).filter(BidRecord::is_active)
    }

    /// The active record at `id`.
    ///
    /// # Errors
    /// Returns `BidNotFound` if the entry is absent.
    pub fn require_active(&self, id: BidId) -> Result<BidRecord> {
        self.lookup(&id).ok_or(RecmatchError::BidNotFound(id))
    }

    #[must_use]
    pub fn is_active(&self, id: &BidId) -> bool {
        self.get(id).is_active()
    }

    /// Whether `id` was destroyed by a cancel or a match.
    #[must_use]
    pub fn is_retired(&self, id: &BidId) -> bool {
        self.retired.contains_key(id)
    }

    /// Number of active records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of retired ids.
    #[must_use]
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Iterate over active records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&BidId, &BidRecord)> {
        self.records.iter()
    }
}

impl Default for BidRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use recmatch_types::{AccountId, RecoveryEpoch, SequenceNumber};
    use rust_decimal::Decimal;

    use super::*;

    fn id(seq: u64) -> BidId {
        BidId::compute(
            AccountId::from_bytes([1; 16]),
            RecoveryEpoch(0),
            Decimal::new(1000, 0),
            SequenceNumber(seq),
        )
    }

    fn record(min_quote: i64) -> BidRecord {
        BidRecord::new(Utc::now() + Duration::hours(1), Decimal::new(min_quote, 0))
    }

    #[test]
    fn absent_key_reads_as_sentinel() {
        let reg = BidRegistry::new();
        assert_eq!(reg.get(&id(1)), BidRecord::EMPTY);
        assert!(reg.lookup(&id(1)).is_none());
        assert!(!reg.is_active(&id(1)));
    }

    #[test]
    fn upsert_creates_then_replaces() {
        let mut reg = BidRegistry::new();
        assert!(reg.upsert(id(1), record(900)).unwrap().is_none());

        let prev = reg.upsert(id(1), record(800)).unwrap();
        assert_eq!(prev.unwrap().min_quote, Decimal::new(900, 0));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.lookup(&id(1)).unwrap().min_quote, Decimal::new(800, 0));
    }

    #[test]
    fn sentinel_cannot_be_stored() {
        let mut reg = BidRegistry::new();
        let err = reg.upsert(id(1), BidRecord::EMPTY).unwrap_err();
        assert!(matches!(err, RecmatchError::Internal(_)));
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_retires_id() {
        let mut reg = BidRegistry::new();
        reg.upsert(id(1), record(900)).unwrap();
        let removed = reg.remove(id(1), SequenceNumber(1)).unwrap();
        assert_eq!(removed.min_quote, Decimal::new(900, 0));

        assert!(reg.lookup(&id(1)).is_none());
        assert!(reg.is_retired(&id(1)));
        assert_eq!(reg.retired_count(), 1);
    }

    #[test]
    fn double_remove_fails() {
        let mut reg = BidRegistry::new();
        reg.upsert(id(1), record(900)).unwrap();
        reg.remove(id(1), SequenceNumber(1)).unwrap();
        let err = reg.remove(id(1), SequenceNumber(1)).unwrap_err();
        assert!(matches!(err, RecmatchError::BidNotFound(_)));
    }

    #[test]
    fn retired_id_cannot_be_reposted() {
        let mut reg = BidRegistry::new();
        reg.upsert(id(1), record(900)).unwrap();
        reg.remove(id(1), SequenceNumber(1)).unwrap();
        let err = reg.upsert(id(1), record(900)).unwrap_err();
        assert!(matches!(err, RecmatchError::BidRetired(_)));
        assert!(reg.is_empty());
    }

    #[test]
    fn keys_are_independent() {
        let mut reg = BidRegistry::new();
        reg.upsert(id(1), record(900)).unwrap();
        reg.upsert(id(2), record(700)).unwrap();
        reg.remove(id(1), SequenceNumber(1)).unwrap();
        assert!(reg.is_active(&id(2)));
        assert_eq!(reg.iter().count(), 1);
    }

    #[test]
    fn retired_ids_from_past_slots_are_pruned() {
        let mut reg = BidRegistry::new();
        for seq in 1..=100 {
            reg.prune_retired(SequenceNumber(seq));
            reg.upsert(id(seq), record(900)).unwrap();
            reg.remove(id(seq), SequenceNumber(seq)).unwrap();
        }
        assert!(reg.is_empty());
        // Only the current slot's retirement is still remembered.
        assert_eq!(reg.retired_count(), 1);
        assert!(reg.is_retired(&id(100)));
        assert!(!reg.is_retired(&id(99)));

        assert_eq!(reg.prune_retired(SequenceNumber(101)), 1);
        assert_eq!(reg.retired_count(), 0);
    }

    #[test]
    fn pruning_keeps_current_slot_retired() {
        let mut reg = BidRegistry::new();
        reg.upsert(id(5), record(900)).unwrap();
        reg.remove(id(5), SequenceNumber(5)).unwrap();

        assert_eq!(reg.prune_retired(SequenceNumber(5)), 0);
        let err = reg.upsert(id(5), record(900)).unwrap_err();
        assert!(matches!(err, RecmatchError::BidRetired(_)));
        // A second prune for the same slot is a no-op.
        assert_eq!(reg.prune_retired(SequenceNumber(5)), 0);
    }

    #[test]
    fn require_active_maps_to_not_found() {
        let reg = BidRegistry::new();
        let err = reg.require_active(id(3)).unwrap_err();
        assert!(matches!(err, RecmatchError::BidNotFound(got) if got == id(3)));
    }
}
