//! # Ports Layer
//!
//! - `inbound`: the API this crate exposes
//! - `outbound`: the traits the host supplies
//! - `locks`: the per-key lock table a store carries

pub mod inbound;
pub mod locks;
pub mod outbound;

pub use inbound::ShellfishLedgerApi;
pub use locks::{KeyGuard, KeyLockTable};
pub use outbound::{
    AccountSerializer, BatchOperation, ChecksumProvider, KeyValueStore, LedgerEventSink,
    PublishError, ScanResult, TimeSource,
};
