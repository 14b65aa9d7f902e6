//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the shellfish ledger.
//!
//! Every mutating call either commits all of its effects or none of them, and
//! returns a typed error on rejection. Reads return the latest committed
//! state.

use crate::domain::address::{Address, Identity};
use crate::domain::entities::{BatchId, BatchRecord, Counter, HarvestRequest};
use crate::domain::errors::LedgerError;
use crate::domain::instruction::{Instruction, Outcome};
use crate::domain::receipts::{CommitId, HarvestReceipt};
use crate::service::LedgerStats;

/// Primary API of the ledger.
///
/// All methods take `&self`: the service serializes operations on
/// overlapping accounts internally, so one instance can be shared across
/// threads behind an `Arc`.
pub trait ShellfishLedgerApi: Send + Sync {
    /// Create the counter singleton with `count = 0`.
    ///
    /// ## Errors
    ///
    /// - `AlreadyInitialized`: the counter already exists
    fn init_counter(&self) -> Result<CommitId, LedgerError>;

    /// Record a new harvest lot owned by `caller`.
    ///
    /// The id is the counter value before increment. The new record and the
    /// incremented counter commit together.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: the counter has not been initialized
    /// - `InvalidInput`: a harvest field is empty or over its bound
    /// - `CounterOverflow`: no ids remain
    fn harvest(
        &self,
        caller: &Identity,
        request: HarvestRequest,
    ) -> Result<HarvestReceipt, LedgerError>;

    /// Mark a batch processed.
    ///
    /// ## Errors
    ///
    /// Checked in order: `NotFound`, `Unauthorized`, `AlreadyProcessed`,
    /// then `InvalidInput` for over-length details.
    fn process(
        &self,
        caller: &Identity,
        batch_id: BatchId,
        processing_details: &str,
    ) -> Result<CommitId, LedgerError>;

    /// Mark a processed batch distributed.
    ///
    /// ## Errors
    ///
    /// Checked in order: `NotFound`, `Unauthorized`, `NotProcessedYet`,
    /// `AlreadyDistributed`, then `InvalidInput` for over-length details.
    fn distribute(
        &self,
        caller: &Identity,
        batch_id: BatchId,
        distribution_details: &str,
    ) -> Result<CommitId, LedgerError>;

    /// Route an instruction to its handler.
    fn dispatch(&self, caller: &Identity, instruction: Instruction)
        -> Result<Outcome, LedgerError>;

    /// Read the counter.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: the counter has not been initialized
    /// - `DataCorruption`: stored bytes failed verification
    fn fetch_counter(&self) -> Result<Counter, LedgerError>;

    /// Read a batch by id.
    fn fetch_batch(&self, batch_id: BatchId) -> Result<BatchRecord, LedgerError>;

    /// Read a batch by storage address.
    fn fetch_batch_at(&self, address: &Address) -> Result<BatchRecord, LedgerError>;

    /// All batches, ordered by id.
    fn list_batches(&self) -> Result<Vec<BatchRecord>, LedgerError>;

    /// Commit and rejection counts since the service was built.
    fn stats(&self) -> LedgerStats;
}
