//! # Adapters Module
//!
//! Concrete implementations of the outbound ports.
//!
//! - `storage`: in-memory and file-backed key-value stores
//! - `serializer`: bincode account encoding
//! - `infra`: clock and checksum
//! - `events`: event sinks
//! - `lock`: data directory process lock

pub mod events;
pub mod infra;
pub mod lock;
pub mod serializer;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub use events::RecordingEventSink;
pub use events::{BroadcastEventSink, NoOpEventSink};
pub use infra::{Crc32ChecksumProvider, FixedTimeSource, SystemTimeSource};
pub use lock::{DatabaseLock, LockError};
pub use serializer::BincodeAccountSerializer;
pub use storage::{FileBackedKVStore, InMemoryKVStore};
