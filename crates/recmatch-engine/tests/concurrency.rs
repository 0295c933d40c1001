//! Concurrency tests for `SharedEngine`.
//!
//! Many liquidity providers race for the same bids from separate threads.
//! Every bid must be consumed exactly once, and the ledgers must conserve
//! supply no matter how the races resolve.

use std::thread;

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use recmatch_engine::{ManualClock, MatchingEngine, SharedEngine};
use recmatch_ledger::{RecoverableLedger, SettlementLedger};
use recmatch_registry::EventLog;
use recmatch_types::*;
use rust_decimal::Decimal;

type Shared = SharedEngine<RecoverableLedger, SettlementLedger, ManualClock, EventLog>;

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn market(bidder: AccountId, lps: &[AccountId]) -> Shared {
    let mut recoverable = RecoverableLedger::new();
    recoverable.mint(bidder, dec(1_000_000), true);

    let mut settlement = SettlementLedger::new();
    for lp in lps {
        settlement.mint(*lp, dec(1_000_000));
        settlement.approve(*lp, dec(1_000_000));
    }

    let engine = MatchingEngine::new(
        EngineConfig::default(),
        recoverable,
        settlement,
        ManualClock::new(Utc::now(), SequenceNumber(1)),
        EventLog::new(),
    )
    .unwrap();
    SharedEngine::new(engine)
}

#[test]
fn racing_lps_fill_a_bid_exactly_once() {
    let bidder = AccountId::new();
    let lps: Vec<AccountId> = (0..8).map(|_| AccountId::new()).collect();
    let shared = market(bidder, &lps);

    let expiration = Utc::now() + Duration::hours(1);
    let id = shared
        .post_bid(bidder, bidder, dec(1000), dec(900), expiration)
        .unwrap();

    let handles: Vec<_> = lps
        .iter()
        .map(|lp| {
            let shared = shared.clone();
            let lp = *lp;
            thread::spawn(move || {
                shared.match_bid(
                    lp,
                    bidder,
                    RecoveryEpoch(0),
                    dec(1000),
                    dec(950),
                    SequenceNumber(1),
                )
            })
        })
        .collect();

    let results: Vec<Result<()>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one LP fills the bid");
    for r in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(r, Err(RecmatchError::BidNotFound(_))));
    }

    assert!(shared.lookup(&id).unwrap().is_none());
    shared
        .with(|engine| {
            assert_eq!(engine.settlement().balance_of(bidder), dec(950));
            engine.recoverable().verify_supply().unwrap();
            engine.settlement().verify_supply().unwrap();
            let exchanges = engine
                .notifier()
                .events()
                .iter()
                .filter(|e| matches!(e, BidEvent::Exchanged(_)))
                .count();
            assert_eq!(exchanges, 1);
        })
        .unwrap();
}

#[test]
fn random_interleaving_consumes_each_bid_once() {
    let bidder = AccountId::new();
    let lps: Vec<AccountId> = (0..4).map(|_| AccountId::new()).collect();
    let shared = market(bidder, &lps);
    let expiration = Utc::now() + Duration::hours(1);

    // Distinct amounts at one sequence give distinct ids.
    let amounts: Vec<i64> = (1..=50).collect();
    for amount in &amounts {
        shared
            .post_bid(bidder, bidder, dec(*amount), dec(1), expiration)
            .unwrap();
    }

    let handles: Vec<_> = lps
        .iter()
        .map(|lp| {
            let shared = shared.clone();
            let lp = *lp;
            let mut order = amounts.clone();
            thread::spawn(move || {
                order.shuffle(&mut rand::thread_rng());
                order
                    .into_iter()
                    .filter(|amount| {
                        shared
                            .match_bid(
                                lp,
                                bidder,
                                RecoveryEpoch(0),
                                dec(*amount),
                                dec(*amount),
                                SequenceNumber(1),
                            )
                            .is_ok()
                    })
                    .count()
            })
        })
        .collect();

    let filled: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(filled, amounts.len());

    shared
        .with(|engine| {
            assert!(engine.registry().is_empty());
            assert_eq!(engine.registry().retired_count(), amounts.len());
            let paid: i64 = amounts.iter().sum();
            assert_eq!(engine.settlement().balance_of(bidder), dec(paid));
            engine.recoverable().verify_supply().unwrap();
            engine.settlement().verify_supply().unwrap();
        })
        .unwrap();
}
