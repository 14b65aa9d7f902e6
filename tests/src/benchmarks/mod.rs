//! # Shellfish Ledger Benchmarks
//!
//! Criterion benchmarks for the ledger service, run from
//! `benches/ledger_benchmarks.rs`.

pub mod ledger;
