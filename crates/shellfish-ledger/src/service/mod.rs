//! # Shellfish Ledger Service
//!
//! The application service implementing [`ShellfishLedgerApi`].
//!
//! ## Architecture
//!
//! Each mutating call:
//! 1. Takes the store's per-key locks for the accounts it touches
//! 2. Reads and verifies current state
//! 3. Checks preconditions in their fixed order
//! 4. Stages every write, then commits them as one atomic batch
//! 5. Publishes a [`LedgerEvent`](crate::domain::events::LedgerEvent)
//!
//! All dependencies are injected, so tests swap in fixed clocks and
//! recording sinks.

mod dispatch;
mod handlers;
mod helpers;
mod queries;
mod staging;
mod stats;

pub use stats::{InstructionStats, LedgerStats};

use crate::adapters::{
    BincodeAccountSerializer, Crc32ChecksumProvider, InMemoryKVStore, NoOpEventSink,
    SystemTimeSource,
};
use crate::domain::config::LedgerConfig;
use crate::ports::outbound::{
    AccountSerializer, ChecksumProvider, KeyValueStore, LedgerEventSink, TimeSource,
};
use stats::StatsRecorder;

/// The shellfish ledger service.
pub struct ShellfishLedgerService<KV, CS, TS, AS, EV>
where
    KV: KeyValueStore,
    CS: ChecksumProvider,
    TS: TimeSource,
    AS: AccountSerializer,
    EV: LedgerEventSink,
{
    /// Key-value store holding counter and batch accounts.
    pub(crate) kv_store: KV,
    /// Checksum over account payloads.
    pub(crate) checksum: CS,
    /// Clock for `harvest_time`.
    pub(crate) time_source: TS,
    /// Account payload encoding.
    pub(crate) serializer: AS,
    /// Post-commit event sink.
    pub(crate) events: EV,
    pub(crate) config: LedgerConfig,
    pub(crate) stats: StatsRecorder,
}

/// Dependencies for ShellfishLedgerService
pub struct LedgerDependencies<KV, CS, TS, AS, EV> {
    pub kv_store: KV,
    pub checksum: CS,
    pub time_source: TS,
    pub serializer: AS,
    pub events: EV,
}

/// Service wired with in-memory storage and no event delivery.
pub type InMemoryLedger = ShellfishLedgerService<
    InMemoryKVStore,
    Crc32ChecksumProvider,
    SystemTimeSource,
    BincodeAccountSerializer,
    NoOpEventSink,
>;

impl<KV, CS, TS, AS, EV> ShellfishLedgerService<KV, CS, TS, AS, EV>
where
    KV: KeyValueStore,
    CS: ChecksumProvider,
    TS: TimeSource,
    AS: AccountSerializer,
    EV: LedgerEventSink,
{
    /// Create a service over the given dependencies.
    ///
    /// Nothing is read at construction; the counter is looked up on each
    /// operation, so a store that already holds accounts is picked up as is.
    pub fn new(deps: LedgerDependencies<KV, CS, TS, AS, EV>, config: LedgerConfig) -> Self {
        Self {
            kv_store: deps.kv_store,
            checksum: deps.checksum,
            time_source: deps.time_source,
            serializer: deps.serializer,
            events: deps.events,
            config,
            stats: StatsRecorder::default(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &KV {
        &self.kv_store
    }

    /// The event sink, e.g. to subscribe to a broadcast sink.
    pub fn events(&self) -> &EV {
        &self.events
    }
}

impl InMemoryLedger {
    /// In-memory service with the system clock.
    pub fn in_memory(config: LedgerConfig) -> Self {
        Self::new(
            LedgerDependencies {
                kv_store: InMemoryKVStore::new(),
                checksum: Crc32ChecksumProvider,
                time_source: SystemTimeSource,
                serializer: BincodeAccountSerializer,
                events: NoOpEventSink,
            },
            config,
        )
    }
}
