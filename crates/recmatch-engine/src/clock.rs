//! Ledger clocks: where the engine gets `now` and the current sequence number.

use chrono::{DateTime, Duration, Utc};
use recmatch_types::{EngineConfig, LedgerClock, SequenceNumber, constants};

/// Wall-clock time; sequence numbers are fixed-width slots of wall time,
/// `unix_ms / interval_ms`, standing in for a block height.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    interval_ms: u64,
}

impl SystemClock {
    /// `interval_ms` of zero is treated as one millisecond.
    #[must_use]
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
        }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sequence_interval_ms)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(constants::DEFAULT_SEQUENCE_INTERVAL_MS)
    }
}

impl LedgerClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sequence(&self) -> SequenceNumber {
        let ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        SequenceNumber(ms / self.interval_ms)
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: DateTime<Utc>,
    sequence: SequenceNumber,
}

impl ManualClock {
    #[must_use]
    pub fn new(now: DateTime<Utc>, sequence: SequenceNumber) -> Self {
        Self { now, sequence }
    }

    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn set_sequence(&mut self, sequence: SequenceNumber) {
        self.sequence = sequence;
    }

    /// Move to the next ledger position.
    pub fn tick(&mut self) -> SequenceNumber {
        self.sequence = SequenceNumber(self.sequence.0 + 1);
        self.sequence
    }
}

impl LedgerClock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn sequence(&self) -> SequenceNumber {
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_sequence_is_monotonic() {
        let clock = SystemClock::new(1);
        let a = clock.sequence();
        let b = clock.sequence();
        assert!(b >= a);
    }

    #[test]
    fn system_sequence_uses_interval() {
        let coarse = SystemClock::new(1_000_000);
        let fine = SystemClock::new(1);
        assert!(fine.sequence().0 > coarse.sequence().0);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let clock = SystemClock::new(0);
        assert!(clock.sequence().0 > 0);
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let start = Utc::now();
        let mut clock = ManualClock::new(start, SequenceNumber(42));
        assert_eq!(clock.now(), start);
        assert_eq!(clock.sequence(), SequenceNumber(42));

        clock.advance(Duration::seconds(10));
        assert_eq!(clock.now(), start + Duration::seconds(10));
        assert_eq!(clock.tick(), SequenceNumber(43));
    }
}
