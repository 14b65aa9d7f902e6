//! # Ledger Service Benchmarks
//!
//! - Harvest: counter allocation plus two-account atomic commit
//! - Transitions: process and distribute on a single lot
//! - Reads: point lookup by id with checksum verification, and full scans
//! - Contention: harvests from several threads serializing on the counter

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shellfish_ledger::prelude::*;
use shellfish_ledger::test_utils::{alice, identity, oyster_request};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn seeded_ledger(batches: u64) -> InMemoryLedger {
    let ledger = InMemoryLedger::in_memory(LedgerConfig::default());
    let _ = ledger.init_counter();
    for _ in 0..batches {
        let _ = ledger.harvest(&alice(), oyster_request());
    }
    ledger
}

pub fn bench_harvest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/harvest");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("single_harvest", |b| {
        let ledger = seeded_ledger(0);
        b.iter(|| black_box(ledger.harvest(&alice(), oyster_request())))
    });

    group.bench_function("full_lifecycle", |b| {
        let ledger = seeded_ledger(0);
        b.iter(|| {
            let receipt = ledger.harvest(&alice(), oyster_request());
            if let Ok(receipt) = receipt {
                let _ = ledger.process(&alice(), receipt.batch_id, "Cleaned and packaged");
                let _ = ledger.distribute(&alice(), receipt.batch_id, "Shipped to buyer");
            }
        })
    });

    group.finish();
}

pub fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/reads");

    for size in [100u64, 1_000, 10_000] {
        let ledger = seeded_ledger(size);
        let mut rng = rand::thread_rng();

        group.bench_with_input(BenchmarkId::new("fetch_batch", size), &ledger, |b, l| {
            b.iter(|| black_box(l.fetch_batch(rng.gen_range(0..size))))
        });

        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("list_batches", size), &ledger, |b, l| {
            b.iter(|| black_box(l.list_batches()))
        });
    }

    group.finish();
}

pub fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger/contention");
    group.sample_size(20);

    for threads in [1usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * 50) as u64));
        group.bench_with_input(
            BenchmarkId::new("parallel_harvests", threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let ledger = Arc::new(seeded_ledger(0));
                    let handles: Vec<_> = (0..threads)
                        .map(|t| {
                            let ledger = Arc::clone(&ledger);
                            thread::spawn(move || {
                                for _ in 0..50 {
                                    let _ = ledger.harvest(&identity(t as u8), oyster_request());
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    black_box(ledger.fetch_counter())
                })
            },
        );
    }

    group.finish();
}
