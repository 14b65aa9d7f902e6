//! # Instructions
//!
//! The four external operations as data, so a caller can name the entities an
//! operation touches before it runs and route it through one entry point.

use super::entities::{BatchId, HarvestRequest};
use super::keys::KeyPrefix;
use super::receipts::{CommitId, HarvestReceipt};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation submitted to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum Instruction {
    InitCounter,
    Harvest {
        species: String,
        harvester: String,
        harvest_location: String,
    },
    Process {
        batch_id: BatchId,
        processing_details: String,
    },
    Distribute {
        batch_id: BatchId,
        distribution_details: String,
    },
}

impl Instruction {
    pub fn harvest(request: HarvestRequest) -> Self {
        Instruction::Harvest {
            species: request.species,
            harvester: request.harvester,
            harvest_location: request.harvest_location,
        }
    }

    pub fn process(batch_id: BatchId, details: impl Into<String>) -> Self {
        Instruction::Process {
            batch_id,
            processing_details: details.into(),
        }
    }

    pub fn distribute(batch_id: BatchId, details: impl Into<String>) -> Self {
        Instruction::Distribute {
            batch_id,
            distribution_details: details.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> InstructionKind {
        match self {
            Instruction::InitCounter => InstructionKind::InitCounter,
            Instruction::Harvest { .. } => InstructionKind::Harvest,
            Instruction::Process { .. } => InstructionKind::Process,
            Instruction::Distribute { .. } => InstructionKind::Distribute,
        }
    }

    /// Storage keys this instruction reads or writes.
    ///
    /// A harvest writes a new batch whose address is only known after the
    /// counter is read. Holding the counter key is enough to make that address
    /// exclusive, so only the counter is declared.
    #[must_use]
    pub fn touched_keys(&self) -> Vec<Vec<u8>> {
        match self {
            Instruction::InitCounter | Instruction::Harvest { .. } => {
                vec![KeyPrefix::counter_key()]
            }
            Instruction::Process { batch_id, .. } | Instruction::Distribute { batch_id, .. } => {
                vec![KeyPrefix::batch_id_key(*batch_id)]
            }
        }
    }
}

/// Instruction discriminant, used for stats and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstructionKind {
    InitCounter,
    Harvest,
    Process,
    Distribute,
}

impl InstructionKind {
    pub const ALL: [InstructionKind; 4] = [
        InstructionKind::InitCounter,
        InstructionKind::Harvest,
        InstructionKind::Process,
        InstructionKind::Distribute,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionKind::InitCounter => "init_counter",
            InstructionKind::Harvest => "harvest",
            InstructionKind::Process => "process",
            InstructionKind::Distribute => "distribute",
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Success token returned by [`dispatch`](crate::ports::inbound::ShellfishLedgerApi::dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    CounterInitialized { commit_id: CommitId },
    Harvested(HarvestReceipt),
    Processed { commit_id: CommitId, batch_id: BatchId },
    Distributed { commit_id: CommitId, batch_id: BatchId },
}

impl Outcome {
    #[must_use]
    pub fn commit_id(&self) -> CommitId {
        match self {
            Outcome::CounterInitialized { commit_id }
            | Outcome::Processed { commit_id, .. }
            | Outcome::Distributed { commit_id, .. } => *commit_id,
            Outcome::Harvested(receipt) => receipt.commit_id,
        }
    }

    /// The batch this outcome refers to, if any.
    #[must_use]
    pub fn batch_id(&self) -> Option<BatchId> {
        match self {
            Outcome::CounterInitialized { .. } => None,
            Outcome::Harvested(receipt) => Some(receipt.batch_id),
            Outcome::Processed { batch_id, .. } | Outcome::Distributed { batch_id, .. } => {
                Some(*batch_id)
            }
        }
    }
}
