//! Event notifiers.
//!
//! The engine hands every successful transition to a [`Notifier`]. It is the
//! only observable side channel besides registry reads.

use std::collections::HashMap;

use recmatch_types::{BidCancelled, BidEvent, BidId, BidRecord, Exchanged, SequenceNumber};

use crate::registry::BidRegistry;

/// Sink for bid lifecycle events.
pub trait Notifier {
    fn notify(&mut self, event: &BidEvent);
}

/// Records every event in emission order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<BidEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[BidEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&BidEvent> {
        self.events.last()
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<BidEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rebuild the active book from the recorded events alone.
    ///
    /// The result matches the engine's registry as long as the log saw every
    /// event since the registry was created.
    #[must_use]
    pub fn replay(&self) -> BidRegistry {
        let mut book = BidRegistry::new();
        let mut posted_at: HashMap<BidId, SequenceNumber> = HashMap::new();
        for event in &self.events {
            let applied = match event {
                BidEvent::BidPosted(e) => {
                    book.prune_retired(e.sequence);
                    posted_at.insert(e.id, e.sequence);
                    book.upsert(e.id, BidRecord::new(e.expiration, e.min_quote))
                        .map(|_| ())
                }
                BidEvent::BidCancelled(BidCancelled { id })
                | BidEvent::Exchanged(Exchanged { id, .. }) => {
                    let sequence = posted_at.remove(id).unwrap_or(SequenceNumber(0));
                    book.remove(*id, sequence).map(|_| ())
                }
            };
            if let Err(err) = applied {
                tracing::warn!(bid = %event.bid_id(), %err, "Event does not apply to replayed book");
            }
        }
        book
    }

    /// Every event concerning `id`, oldest first.
    pub fn history(&self, id: BidId) -> impl Iterator<Item = &BidEvent> {
        self.events.iter().filter(move |e| e.bid_id() == id)
    }
}

impl Notifier for EventLog {
    fn notify(&mut self, event: &BidEvent) {
        self.events.push(event.clone());
    }
}

/// Emits each event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, event: &BidEvent) {
        match event {
            BidEvent::BidPosted(e) => tracing::info!(
                kind = %event,
                bid = %e.id,
                bidder = %e.bidder,
                epoch = e.epoch.0,
                amount = %e.amount,
                min_quote = %e.min_quote,
                expiration = %e.expiration,
                sequence = e.sequence.0,
                "Bid posted"
            ),
            BidEvent::BidCancelled(e) => tracing::info!(kind = %event, bid = %e.id, "Bid cancelled"),
            BidEvent::Exchanged(e) => tracing::info!(
                kind = %event,
                bid = %e.id,
                bidder = %e.bidder,
                lp = %e.lp,
                amount = %e.amount,
                quote = %e.quote,
                "Exchanged"
            ),
        }
    }
}

/// Fan one event out to two sinks.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&mut self, event: &BidEvent) {
        self.0.notify(event);
        self.1.notify(event);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use recmatch_types::{AccountId, BidPosted, RecoveryEpoch};
    use rust_decimal::Decimal;

    use super::*;

    fn posted(seq: u64) -> BidPosted {
        let bidder = AccountId::from_bytes([4; 16]);
        let amount = Decimal::new(1000, 0);
        BidPosted {
            bidder,
            epoch: RecoveryEpoch(1),
            amount,
            min_quote: Decimal::new(900, 0),
            expiration: Utc::now() + Duration::hours(1),
            sequence: SequenceNumber(seq),
            id: BidId::compute(bidder, RecoveryEpoch(1), amount, SequenceNumber(seq)),
        }
    }

    #[test]
    fn log_keeps_emission_order() {
        let mut log = EventLog::new();
        let p = posted(1);
        log.notify(&p.clone().into());
        log.notify(&BidCancelled { id: p.id }.into());

        assert_eq!(log.len(), 2);
        assert!(matches!(log.events()[0], BidEvent::BidPosted(_)));
        assert!(matches!(log.last(), Some(BidEvent::BidCancelled(_))));
        assert_eq!(log.history(p.id).count(), 2);
    }

    #[test]
    fn replay_rebuilds_book() {
        let mut log = EventLog::new();
        let a = posted(1);
        let b = posted(2);
        log.notify(&a.clone().into());
        log.notify(&b.clone().into());
        log.notify(
            &Exchanged {
                bidder: a.bidder,
                lp: AccountId::new(),
                amount: a.amount,
                quote: Decimal::new(950, 0),
                id: a.id,
            }
            .into(),
        );

        let book = log.replay();
        assert!(book.lookup(&a.id).is_none());
        assert_eq!(book.lookup(&b.id).unwrap().min_quote, b.min_quote);
    }

    #[test]
    fn drain_empties_log() {
        let mut log = EventLog::new();
        log.notify(&posted(1).into());
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn pair_fans_out() {
        let mut pair = (EventLog::new(), TracingNotifier);
        pair.notify(&posted(1).into());
        assert_eq!(pair.0.len(), 1);
    }

    #[test]
    fn events_serialize_for_indexers() {
        let mut log = EventLog::new();
        log.notify(&posted(7).into());
        let json = serde_json::to_string(log.events()).unwrap();
        assert!(json.contains("\"kind\":\"BidPosted\""));
    }
}
