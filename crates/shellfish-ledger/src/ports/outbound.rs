//! # Outbound Ports (Driven Ports)
//!
//! Dependencies required by the ledger service.
//!
//! These are the interfaces the host application implements (or picks an
//! adapter for from `crate::adapters`).

use crate::domain::entities::{BatchRecord, Counter, Timestamp};
use crate::domain::errors::{KVStoreError, SerializationError};
use crate::domain::events::LedgerEvent;
use crate::ports::locks::KeyLockTable;
use std::sync::Arc;
use thiserror::Error;

/// Result of a prefix scan: `(key, value)` pairs in no particular order.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for key-value database operations.
///
/// Methods take `&self`; implementations synchronize internally so the
/// service can run operations on disjoint keys from several threads.
///
/// The store also carries the [`KeyLockTable`] that serializes ledger
/// operations on overlapping keys. Every service over the same store,
/// including through an `Arc`, takes its locks from that one table.
///
/// Production: `FileBackedKVStore` or the runtime's RocksDB store.
/// Testing: `InMemoryKVStore`.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch are applied, or NONE are.
    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Iterate over keys with a prefix.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;

    /// Lock table for the keys of this store.
    fn key_locks(&self) -> &KeyLockTable;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }

    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}

/// Abstract interface for checksum computation.
pub trait ChecksumProvider: Send + Sync {
    /// Compute a CRC32 checksum of data.
    fn compute_crc32(&self, data: &[u8]) -> u32;

    /// Verify a CRC32 checksum matches.
    fn verify_crc32(&self, data: &[u8], expected: u32) -> bool {
        self.compute_crc32(data) == expected
    }
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current time in seconds since epoch.
    fn now(&self) -> Timestamp;
}

/// Abstract interface for account payload encoding.
pub trait AccountSerializer: Send + Sync {
    fn serialize_counter(&self, counter: &Counter) -> Result<Vec<u8>, SerializationError>;

    fn deserialize_counter(&self, data: &[u8]) -> Result<Counter, SerializationError>;

    fn serialize_batch(&self, batch: &BatchRecord) -> Result<Vec<u8>, SerializationError>;

    fn deserialize_batch(&self, data: &[u8]) -> Result<BatchRecord, SerializationError>;
}

/// Event sink for committed ledger changes.
///
/// Called after the commit; an error is logged by the service and does not
/// undo the commit.
pub trait LedgerEventSink: Send + Sync {
    fn publish(&self, event: LedgerEvent) -> Result<(), PublishError>;
}

/// Error type for publish operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The sink is shut down or unreachable.
    #[error("event sink unavailable: {0}")]
    Unavailable(String),
    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

// Shared handles: lets the host keep an `Arc` to a store, clock or sink that
// it also hands to the service.

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        (**self).delete(key)
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        (**self).atomic_batch_write(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        (**self).exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        (**self).prefix_scan(prefix)
    }

    fn key_locks(&self) -> &KeyLockTable {
        (**self).key_locks()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<T: LedgerEventSink + ?Sized> LedgerEventSink for Arc<T> {
    fn publish(&self, event: LedgerEvent) -> Result<(), PublishError> {
        (**self).publish(event)
    }
}
