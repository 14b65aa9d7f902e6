//! # Shellfish Ledger
//!
//! Tracks shellfish harvest lots through a fixed lifecycle:
//!
//! ```text
//! harvest ──→ Harvested ──process──→ Processed ──distribute──→ Distributed
//! ```
//!
//! Each lot gets its `batch_id` from a shared sequence counter. Only the
//! identity that harvested a lot may process or distribute it.
//!
//! ## Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Sequential ids | `batch_id` is the counter value before increment; ids are `0, 1, 2, ...` |
//! | Atomic commit | A harvest writes counter and record together or not at all |
//! | Fixed authority | A record's authority is set at harvest and never changes |
//! | Forward only | No lifecycle step is skipped or repeated |
//! | Integrity | Every read checks the account kind tag and CRC32 checksum |
//!
//! ## Concurrency
//!
//! Every operation holds the storage keys it touches for its whole run. The
//! lock table belongs to the store, so services sharing a store share it.
//! Harvests all touch the counter and run one at a time; process and
//! distribute on different batches run in parallel.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure domain types and rules
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `adapters/` - Stores, serializer, clock, checksum, event sinks, directory lock
//! - `service/` - Application service implementing the API
//!
//! ## Usage
//!
//! ```
//! use shellfish_ledger::prelude::*;
//!
//! let ledger = InMemoryLedger::in_memory(LedgerConfig::default());
//! let harvester = Identity::new([7; 32]);
//!
//! ledger.init_counter()?;
//! let receipt = ledger.harvest(
//!     &harvester,
//!     HarvestRequest::new("Oyster", "John Doe", "Gulf Coast"),
//! )?;
//! ledger.process(&harvester, receipt.batch_id, "Cleaned and packaged")?;
//! ledger.distribute(&harvester, receipt.batch_id, "Shipped to buyer")?;
//!
//! let batch = ledger.fetch_batch(receipt.batch_id)?;
//! assert_eq!(batch.state(), BatchState::Distributed);
//! # Ok::<(), LedgerError>(())
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export key types for convenience
pub use domain::address::{Address, Identity};
pub use domain::config::{FieldLimits, LedgerConfig};
pub use domain::entities::{BatchId, BatchRecord, BatchState, Counter, HarvestRequest, Timestamp};
pub use domain::errors::{AccountRef, KVStoreError, LedgerError};
pub use domain::events::LedgerEvent;
pub use domain::instruction::{Instruction, InstructionKind, Outcome};
pub use domain::receipts::{CommitId, HarvestReceipt};
pub use ports::inbound::ShellfishLedgerApi;
pub use ports::locks::KeyLockTable;
pub use ports::outbound::{
    AccountSerializer, BatchOperation, ChecksumProvider, KeyValueStore, LedgerEventSink,
    TimeSource,
};
pub use service::{InMemoryLedger, LedgerDependencies, LedgerStats, ShellfishLedgerService};

/// Common imports for callers of the ledger.
pub mod prelude {
    pub use crate::domain::address::{Address, Identity};
    pub use crate::domain::config::LedgerConfig;
    pub use crate::domain::entities::{BatchRecord, BatchState, Counter, HarvestRequest};
    pub use crate::domain::errors::LedgerError;
    pub use crate::domain::instruction::{Instruction, Outcome};
    pub use crate::ports::inbound::ShellfishLedgerApi;
    pub use crate::service::InMemoryLedger;
}
