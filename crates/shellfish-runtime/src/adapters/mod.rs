//! # Production Storage Adapters
//!
//! Enable the `rocksdb` feature to use the RocksDB store:
//!
//! ```toml
//! shellfish-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! The file-backed and in-memory stores live in `shellfish-ledger`.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};
