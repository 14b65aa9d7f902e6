//! # Shellfish Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Criterion benchmarks for the ledger service
//! │   └── ledger.rs
//! │
//! └── integration/      # Cross-crate flows
//!     ├── lifecycle.rs   # Lot lifecycle through the public API and dispatcher
//!     ├── concurrency.rs # Threads and tokio tasks sharing one ledger
//!     ├── persistence.rs # File store, restart, corruption, directory lock
//!     └── events.rs      # Broadcast subscribers and metrics
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p shellfish-tests
//! cargo test -p shellfish-tests integration::concurrency
//! cargo bench -p shellfish-tests
//! ```

pub mod benchmarks;
pub mod integration;
