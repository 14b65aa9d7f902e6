//! # Shellfish Runtime
//!
//! Wires the shellfish ledger for use from the command line.
//!
//! ## Modular Structure
//!
//! - `config` - Runtime configuration from environment and CLI flags
//! - `container` - Storage backend selection and service wiring
//! - `adapters/` - Production storage backends (RocksDB)
//! - `wallet` - Caller identity file
//! - `workflow` - Ledger operations with metrics, and the end-to-end demo
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (env, then CLI overrides)
//! 2. Initialize telemetry
//! 3. Lock the data directory and open the store
//! 4. Load or create the caller identity
//! 5. Run the requested subcommand

pub mod adapters;
pub mod config;
pub mod container;
pub mod wallet;
pub mod workflow;

pub use config::{RuntimeConfig, RuntimeConfigError, StorageBackend};
pub use container::{LedgerContainer, RuntimeLedger, RuntimeStore};
pub use wallet::{load_or_create_identity, WalletError};
pub use workflow::{CounterSetup, DemoReport, Workflow};
