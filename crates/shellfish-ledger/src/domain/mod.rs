//! # Domain Layer
//!
//! Pure types and rules: no I/O, no locking.

pub mod account;
pub mod address;
pub mod authority;
pub mod config;
pub mod entities;
pub mod errors;
pub mod events;
pub mod instruction;
pub mod keys;
pub mod receipts;

pub use account::{AccountEnvelope, AccountKind, EnvelopeError};
pub use address::{Address, HexParseError, Identity};
pub use authority::ensure_authority;
pub use config::{ConfigError, FieldLimits, InputViolation, LedgerConfig, TextField};
pub use entities::{BatchId, BatchRecord, BatchState, Counter, HarvestRequest, Timestamp};
pub use errors::{AccountRef, KVStoreError, LedgerError, SerializationError};
pub use events::LedgerEvent;
pub use instruction::{Instruction, InstructionKind, Outcome};
pub use keys::KeyPrefix;
pub use receipts::{CommitId, HarvestReceipt};
