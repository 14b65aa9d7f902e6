//! Test fixtures: deterministic identities, a fixed clock and a service wired
//! to observable adapters.

use crate::adapters::{
    BincodeAccountSerializer, Crc32ChecksumProvider, FixedTimeSource, InMemoryKVStore,
    RecordingEventSink,
};
use crate::domain::address::Identity;
use crate::domain::config::LedgerConfig;
use crate::domain::entities::{HarvestRequest, Timestamp};
use crate::service::{LedgerDependencies, ShellfishLedgerService};
use std::sync::Arc;

/// Clock value used by [`TestLedger`].
pub const TEST_NOW: Timestamp = 1_700_000_000;

/// Service with shared handles to its store, clock and event sink.
pub type TestService = ShellfishLedgerService<
    Arc<InMemoryKVStore>,
    Crc32ChecksumProvider,
    Arc<FixedTimeSource>,
    BincodeAccountSerializer,
    Arc<RecordingEventSink>,
>;

pub struct TestLedger {
    pub service: TestService,
    pub store: Arc<InMemoryKVStore>,
    pub clock: Arc<FixedTimeSource>,
    pub events: Arc<RecordingEventSink>,
}

impl TestLedger {
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        let store = Arc::new(InMemoryKVStore::new());
        let clock = Arc::new(FixedTimeSource::new(TEST_NOW));
        let events = Arc::new(RecordingEventSink::new());
        let service = ShellfishLedgerService::new(
            LedgerDependencies {
                kv_store: Arc::clone(&store),
                checksum: Crc32ChecksumProvider,
                time_source: Arc::clone(&clock),
                serializer: BincodeAccountSerializer,
                events: Arc::clone(&events),
            },
            config,
        );
        Self {
            service,
            store,
            clock,
            events,
        }
    }
}

impl Default for TestLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic identity with every byte set to `seed`.
pub fn identity(seed: u8) -> Identity {
    Identity::new([seed; 32])
}

/// The identity used as harvester in most tests.
pub fn alice() -> Identity {
    identity(0xA1)
}

pub fn bob() -> Identity {
    identity(0xB0)
}

pub fn oyster_request() -> HarvestRequest {
    HarvestRequest::new("Oyster", "John Doe", "Gulf Coast")
}

pub fn clam_request() -> HarvestRequest {
    HarvestRequest::new("Clam", "Jane Smith", "Pacific Coast")
}
