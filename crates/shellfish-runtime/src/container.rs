//! # Ledger Container
//!
//! Opens the configured store under the data directory lock and wires the
//! ledger service with production adapters.
//!
//! ## Drop Order
//!
//! The service (and with it the store) is dropped before the directory lock
//! is released.

use anyhow::{Context, Result};
use shellfish_ledger::adapters::{
    BincodeAccountSerializer, BroadcastEventSink, Crc32ChecksumProvider, DatabaseLock,
    FileBackedKVStore, InMemoryKVStore, SystemTimeSource,
};
use shellfish_ledger::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use shellfish_ledger::{KVStoreError, KeyLockTable, LedgerDependencies, ShellfishLedgerService};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[cfg(feature = "rocksdb")]
use crate::adapters::{RocksDbConfig, RocksDbStore};
use crate::config::{RuntimeConfig, StorageBackend};

/// The ledger service as wired by the runtime.
pub type RuntimeLedger = ShellfishLedgerService<
    RuntimeStore,
    Crc32ChecksumProvider,
    SystemTimeSource,
    BincodeAccountSerializer,
    Arc<BroadcastEventSink>,
>;

/// Store selected at startup.
pub enum RuntimeStore {
    Memory(InMemoryKVStore),
    File(FileBackedKVStore),
    #[cfg(feature = "rocksdb")]
    RocksDb(RocksDbStore),
}

impl RuntimeStore {
    /// Open the backend named by `config`.
    pub fn open(config: &RuntimeConfig) -> Result<Self, KVStoreError> {
        match config.backend {
            StorageBackend::Memory => Ok(RuntimeStore::Memory(InMemoryKVStore::new())),
            StorageBackend::File => {
                FileBackedKVStore::open(config.store_file()).map(RuntimeStore::File)
            }
            #[cfg(feature = "rocksdb")]
            StorageBackend::RocksDb => RocksDbStore::open(RocksDbConfig::new(config.rocksdb_dir()))
                .map(RuntimeStore::RocksDb),
            #[cfg(not(feature = "rocksdb"))]
            StorageBackend::RocksDb => Err(KVStoreError::IOError {
                message: "RocksDB support not compiled in".to_string(),
            }),
        }
    }

    pub fn backend(&self) -> StorageBackend {
        match self {
            RuntimeStore::Memory(_) => StorageBackend::Memory,
            RuntimeStore::File(_) => StorageBackend::File,
            #[cfg(feature = "rocksdb")]
            RuntimeStore::RocksDb(_) => StorageBackend::RocksDb,
        }
    }
}

macro_rules! delegate {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            RuntimeStore::Memory($store) => $call,
            RuntimeStore::File($store) => $call,
            #[cfg(feature = "rocksdb")]
            RuntimeStore::RocksDb($store) => $call,
        }
    };
}

impl KeyValueStore for RuntimeStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        delegate!(self, store => store.get(key))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        delegate!(self, store => store.put(key, value))
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        delegate!(self, store => store.delete(key))
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        delegate!(self, store => store.atomic_batch_write(operations))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        delegate!(self, store => store.exists(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        delegate!(self, store => store.prefix_scan(prefix))
    }

    fn key_locks(&self) -> &KeyLockTable {
        delegate!(self, store => store.key_locks())
    }
}

/// Wired ledger plus the resources it depends on.
pub struct LedgerContainer {
    ledger: Arc<RuntimeLedger>,
    events: Arc<BroadcastEventSink>,
    config: RuntimeConfig,
    /// Held for the container's lifetime; `None` for the memory backend.
    _lock: Option<DatabaseLock>,
}

impl LedgerContainer {
    /// Validate `config`, lock the data directory and open the store.
    pub fn build(config: RuntimeConfig) -> Result<Self> {
        config.validate().context("invalid runtime configuration")?;

        let lock = if config.backend.is_persistent() {
            let lock = DatabaseLock::acquire_with_timeout(&config.data_dir, config.lock_timeout)
                .with_context(|| {
                    format!("failed to lock data directory {}", config.data_dir.display())
                })?;
            Some(lock)
        } else {
            None
        };

        let store = RuntimeStore::open(&config)
            .with_context(|| format!("failed to open {} store", config.backend))?;
        let events = Arc::new(BroadcastEventSink::with_capacity(
            config.ledger.event_channel_capacity,
        ));

        let ledger = ShellfishLedgerService::new(
            LedgerDependencies {
                kv_store: store,
                checksum: Crc32ChecksumProvider,
                time_source: SystemTimeSource,
                serializer: BincodeAccountSerializer,
                events: Arc::clone(&events),
            },
            config.ledger.clone(),
        );

        info!(
            backend = %config.backend,
            data_dir = %config.data_dir.display(),
            "Ledger container ready"
        );

        Ok(Self {
            ledger: Arc::new(ledger),
            events,
            config,
            _lock: lock,
        })
    }

    pub fn ledger(&self) -> Arc<RuntimeLedger> {
        Arc::clone(&self.ledger)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn events(&self) -> &BroadcastEventSink {
        &self.events
    }

    /// Count published events into the metrics registry until the container
    /// and every ledger handle are dropped.
    pub fn spawn_event_monitor(&self) -> JoinHandle<u64> {
        let mut receiver = self.events.subscribe();
        tokio::spawn(async move {
            let mut seen = 0u64;
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        seen += 1;
                        shellfish_telemetry::record_event(event.event_type());
                        debug!(
                            event_type = event.event_type(),
                            commit_id = %event.commit_id(),
                            "Ledger event"
                        );
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Event monitor lagged behind the ledger");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            seen
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellfish_ledger::test_utils::alice;
    use shellfish_ledger::{HarvestRequest, LedgerError, ShellfishLedgerApi};
    use tempfile::tempdir;

    fn file_config(dir: &std::path::Path) -> RuntimeConfig {
        RuntimeConfig {
            data_dir: dir.to_path_buf(),
            backend: StorageBackend::File,
            lock_timeout: std::time::Duration::from_millis(50),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn test_file_backend_survives_restart() {
        let dir = tempdir().unwrap();
        {
            let container = LedgerContainer::build(file_config(dir.path())).unwrap();
            let ledger = container.ledger();
            ledger.init_counter().unwrap();
            ledger
                .harvest(&alice(), HarvestRequest::new("Oyster", "John Doe", "Gulf Coast"))
                .unwrap();
        }

        let container = LedgerContainer::build(file_config(dir.path())).unwrap();
        let ledger = container.ledger();
        assert_eq!(ledger.fetch_counter().unwrap().count, 1);
        assert_eq!(ledger.fetch_batch(0).unwrap().species, "Oyster");
        assert!(matches!(
            ledger.init_counter(),
            Err(LedgerError::AlreadyInitialized { .. })
        ));
    }

    #[test]
    fn test_second_container_on_same_dir_is_refused() {
        let dir = tempdir().unwrap();
        let _first = LedgerContainer::build(file_config(dir.path())).unwrap();
        assert!(LedgerContainer::build(file_config(dir.path())).is_err());
    }

    #[test]
    fn test_memory_backend_takes_no_lock() {
        let config = RuntimeConfig {
            backend: StorageBackend::Memory,
            data_dir: std::path::PathBuf::from("/nonexistent/shellfish"),
            ..RuntimeConfig::default()
        };
        let a = LedgerContainer::build(config.clone()).unwrap();
        let b = LedgerContainer::build(config).unwrap();
        a.ledger().init_counter().unwrap();
        b.ledger().init_counter().unwrap();
    }

    #[tokio::test]
    async fn test_event_monitor_counts_until_drop() {
        let config = RuntimeConfig {
            backend: StorageBackend::Memory,
            ..RuntimeConfig::default()
        };
        let container = LedgerContainer::build(config).unwrap();
        let monitor = container.spawn_event_monitor();

        let ledger = container.ledger();
        ledger.init_counter().unwrap();
        ledger
            .harvest(&alice(), HarvestRequest::new("Clam", "Jane Smith", "Pacific Coast"))
            .unwrap();

        drop(ledger);
        drop(container);
        assert_eq!(monitor.await.unwrap(), 2);
    }
}
