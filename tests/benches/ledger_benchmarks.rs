//! # Shellfish Ledger Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | `ledger/harvest` | allocate + commit, and a full lot lifecycle |
//! | `ledger/reads` | checksum-verified point reads and prefix scans |
//! | `ledger/contention` | harvest throughput as threads contend on the counter |

use criterion::{criterion_group, criterion_main};
use shellfish_tests::benchmarks::ledger::{bench_contention, bench_harvest, bench_reads};

criterion_group!(benches, bench_harvest, bench_reads, bench_contention);
criterion_main!(benches);
