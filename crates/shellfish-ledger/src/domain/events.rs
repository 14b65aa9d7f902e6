//! # Ledger Events
//!
//! Published after each commit for downstream consumers (metrics, audit
//! trail, UI refresh). Events describe what was committed and are never
//! emitted for rejected operations.

use super::address::{Address, Identity};
use super::entities::{BatchId, Timestamp};
use super::receipts::CommitId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    CounterInitialized {
        commit_id: CommitId,
        address: Address,
    },
    BatchHarvested {
        commit_id: CommitId,
        batch_id: BatchId,
        address: Address,
        species: String,
        authority: Identity,
        harvest_time: Timestamp,
        /// Counter value after the allocation.
        counter: u64,
    },
    BatchProcessed {
        commit_id: CommitId,
        batch_id: BatchId,
        authority: Identity,
    },
    BatchDistributed {
        commit_id: CommitId,
        batch_id: BatchId,
        authority: Identity,
    },
}

impl LedgerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::CounterInitialized { .. } => "counter_initialized",
            LedgerEvent::BatchHarvested { .. } => "batch_harvested",
            LedgerEvent::BatchProcessed { .. } => "batch_processed",
            LedgerEvent::BatchDistributed { .. } => "batch_distributed",
        }
    }

    pub fn commit_id(&self) -> CommitId {
        match self {
            LedgerEvent::CounterInitialized { commit_id, .. }
            | LedgerEvent::BatchHarvested { commit_id, .. }
            | LedgerEvent::BatchProcessed { commit_id, .. }
            | LedgerEvent::BatchDistributed { commit_id, .. } => *commit_id,
        }
    }

    pub fn batch_id(&self) -> Option<BatchId> {
        match self {
            LedgerEvent::CounterInitialized { .. } => None,
            LedgerEvent::BatchHarvested { batch_id, .. }
            | LedgerEvent::BatchProcessed { batch_id, .. }
            | LedgerEvent::BatchDistributed { batch_id, .. } => Some(*batch_id),
        }
    }
}
