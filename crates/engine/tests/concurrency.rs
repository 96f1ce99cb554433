//! Integration tests for the concurrency guarantee: mutations are
//! serialized, so racing buyers can never oversell a product, and the
//! seller credit always commits with its counter update.

use std::sync::Arc;
use std::thread;

use shopledger_core::{AccountId, LedgerError};
use shopledger_engine::{CreateProduct, MarketEvent, MarketplaceEngine};

fn listing(seller: AccountId, price: u64, stock: u64) -> CreateProduct {
    CreateProduct {
        sku: 1,
        name: "Widget".to_string(),
        image: String::new(),
        description: String::new(),
        price,
        quantity_available: stock,
        caller: seller,
    }
}

#[test]
fn racing_buyers_never_oversell() {
    const STOCK: u64 = 5;
    const BUYERS: usize = 16;

    let engine = Arc::new(MarketplaceEngine::in_memory());
    let seller = AccountId::new();
    let index = engine.create_product(listing(seller, 100, STOCK)).unwrap();

    let outcomes: Vec<_> = thread::scope(|s| {
        (0..BUYERS)
            .map(|_| {
                let engine = Arc::clone(&engine);
                s.spawn(move || engine.buy_product(index, 100, AccountId::new()))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect()
    });

    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes as u64, STOCK);
    for outcome in &outcomes {
        if let Err(err) = outcome {
            assert_eq!(*err, LedgerError::OutOfStock);
        }
    }

    let record = engine.get(index).unwrap();
    assert_eq!(record.quantity_available, 0);
    assert_eq!(record.quantity_sold, STOCK);
    assert_eq!(engine.balance_of(seller), STOCK * 100);
}

#[test]
fn racing_creators_get_dense_distinct_indices() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 10;

    let engine = Arc::new(MarketplaceEngine::in_memory());

    let mut indices: Vec<u64> = thread::scope(|s| {
        (0..THREADS)
            .map(|t| {
                let engine = Arc::clone(&engine);
                s.spawn(move || {
                    let seller = AccountId::new();
                    (0..PER_THREAD)
                        .map(|i| {
                            engine
                                .create_product(CreateProduct {
                                    sku: (t * PER_THREAD + i) as u64,
                                    ..listing(seller, 100, 1)
                                })
                                .unwrap()
                        })
                        .collect::<Vec<u64>>()
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    indices.sort_unstable();
    let expected: Vec<u64> = (0..(THREADS * PER_THREAD) as u64).collect();
    assert_eq!(indices, expected);
    assert_eq!(engine.count(), (THREADS * PER_THREAD) as u64);
}

#[test]
fn sold_events_carry_a_serialized_counter_history() {
    const STOCK: u64 = 4;

    let engine = Arc::new(MarketplaceEngine::in_memory());
    let seller = AccountId::new();
    let index = engine.create_product(listing(seller, 50, STOCK)).unwrap();
    let sub = engine.subscribe();

    thread::scope(|s| {
        for _ in 0..STOCK {
            let engine = Arc::clone(&engine);
            s.spawn(move || engine.buy_product(index, 50, AccountId::new()).unwrap());
        }
    });

    // Commits are serialized, so the per-subscriber stream must show the
    // counters stepping one unit at a time.
    let mut sold_counters = Vec::new();
    while let Ok(event) = sub.try_recv() {
        match event {
            MarketEvent::ProductSold(e) => {
                assert_eq!(e.quantity_sold + e.quantity_available, STOCK);
                sold_counters.push(e.quantity_sold);
            }
            MarketEvent::ProductCreated(_) => panic!("created after subscribe"),
        }
    }
    assert_eq!(sold_counters, vec![1, 2, 3, 4]);
}

#[test]
fn concurrent_reads_see_committed_state_only() {
    let engine = Arc::new(MarketplaceEngine::in_memory());
    let seller = AccountId::new();
    let index = engine.create_product(listing(seller, 100, 50)).unwrap();

    thread::scope(|s| {
        let writer = Arc::clone(&engine);
        s.spawn(move || {
            for _ in 0..50 {
                writer.buy_product(index, 100, AccountId::new()).unwrap();
            }
        });

        let reader = Arc::clone(&engine);
        s.spawn(move || {
            for _ in 0..200 {
                let record = reader.get(index).unwrap();
                assert_eq!(record.quantity_available + record.quantity_sold, 50);
            }
        });
    });

    let record = engine.get(index).unwrap();
    assert_eq!(record.quantity_available, 0);
    assert_eq!(engine.balance_of(seller), 5_000);
}
