//! # Domain Errors
//!
//! Error types for the ledger.
//!
//! The first seven [`LedgerError`] variants are the rejection taxonomy: the
//! operation was refused and nothing was written. The remaining variants are
//! infrastructure failures, which also leave the store untouched because every
//! commit is a single atomic batch.

use super::address::{Address, Identity};
use super::config::{InputViolation, TextField};
use super::entities::BatchId;
use std::fmt;
use thiserror::Error;

/// The account an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRef {
    /// The counter singleton.
    Counter,
    /// A batch record by id.
    Batch(BatchId),
    /// A batch record by raw address.
    Address(Address),
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRef::Counter => write!(f, "counter"),
            AccountRef::Batch(id) => write!(f, "batch {}", id),
            AccountRef::Address(address) => write!(f, "account {}", address),
        }
    }
}

/// Errors returned by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The counter account already exists.
    #[error("counter already initialized at {address}")]
    AlreadyInitialized { address: Address },

    /// A text field is empty or over its length bound.
    #[error("invalid {field}: {violation}")]
    InvalidInput {
        field: TextField,
        violation: InputViolation,
    },

    /// The counter or batch does not exist.
    #[error("{account} not found")]
    NotFound { account: AccountRef },

    /// Caller is not the batch's authority.
    #[error("caller {caller} is not the authority of batch {batch_id}")]
    Unauthorized { batch_id: BatchId, caller: Identity },

    #[error("shellfish batch {batch_id} has already been processed")]
    AlreadyProcessed { batch_id: BatchId },

    #[error("shellfish batch {batch_id} has not been processed yet")]
    NotProcessedYet { batch_id: BatchId },

    #[error("shellfish batch {batch_id} has already been distributed")]
    AlreadyDistributed { batch_id: BatchId },

    /// The counter reached `u64::MAX` and cannot mint another id.
    #[error("counter exhausted at {count}")]
    CounterOverflow { count: u64 },

    /// Stored bytes failed the kind tag or checksum check.
    #[error("data corruption at {account}: {reason}")]
    DataCorruption { account: AccountRef, reason: String },

    #[error(transparent)]
    Storage(#[from] KVStoreError),

    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

impl LedgerError {
    /// Stable numeric code for this error.
    ///
    /// Rejections occupy `6000..=6006`; infrastructure failures start at 7000.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            LedgerError::AlreadyInitialized { .. } => 6000,
            LedgerError::InvalidInput { .. } => 6001,
            LedgerError::NotFound { .. } => 6002,
            LedgerError::Unauthorized { .. } => 6003,
            LedgerError::AlreadyProcessed { .. } => 6004,
            LedgerError::NotProcessedYet { .. } => 6005,
            LedgerError::AlreadyDistributed { .. } => 6006,
            LedgerError::CounterOverflow { .. } => 7000,
            LedgerError::DataCorruption { .. } => 7001,
            LedgerError::Storage(_) => 7002,
            LedgerError::Serialization(_) => 7003,
        }
    }

    /// Short tag, used as a log field and metric label.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            LedgerError::AlreadyInitialized { .. } => "already_initialized",
            LedgerError::InvalidInput { .. } => "invalid_input",
            LedgerError::NotFound { .. } => "not_found",
            LedgerError::Unauthorized { .. } => "unauthorized",
            LedgerError::AlreadyProcessed { .. } => "already_processed",
            LedgerError::NotProcessedYet { .. } => "not_processed_yet",
            LedgerError::AlreadyDistributed { .. } => "already_distributed",
            LedgerError::CounterOverflow { .. } => "counter_overflow",
            LedgerError::DataCorruption { .. } => "data_corruption",
            LedgerError::Storage(_) => "storage",
            LedgerError::Serialization(_) => "serialization",
        }
    }

    /// True if the operation was refused by a precondition rather than failing.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        self.code() < 7000
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// The backing file or database is malformed.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },
}

/// Serialization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Serialization error: {message}")]
pub struct SerializationError {
    pub message: String,
}
