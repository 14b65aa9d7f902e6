//! # Integration Flows
//!
//! Exercise the ledger through its public API together with the runtime
//! container and telemetry crates.

pub mod concurrency;
pub mod events;
pub mod lifecycle;
pub mod persistence;
