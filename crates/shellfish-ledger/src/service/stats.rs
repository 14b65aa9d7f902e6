//! # Service Statistics
//!
//! Per-instruction counts of commits, precondition rejections and
//! infrastructure failures.

use crate::domain::errors::LedgerError;
use crate::domain::instruction::InstructionKind;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts for one instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InstructionStats {
    pub committed: u64,
    /// Refused by a precondition (codes 6000..=6006).
    pub rejected: u64,
    /// Failed in storage, serialization or integrity checks.
    pub failed: u64,
}

/// Snapshot of service statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub init_counter: InstructionStats,
    pub harvest: InstructionStats,
    pub process: InstructionStats,
    pub distribute: InstructionStats,
}

impl LedgerStats {
    #[must_use]
    pub fn get(&self, kind: InstructionKind) -> InstructionStats {
        match kind {
            InstructionKind::InitCounter => self.init_counter,
            InstructionKind::Harvest => self.harvest,
            InstructionKind::Process => self.process,
            InstructionKind::Distribute => self.distribute,
        }
    }

    #[must_use]
    pub fn total_committed(&self) -> u64 {
        InstructionKind::ALL
            .iter()
            .map(|kind| self.get(*kind).committed)
            .sum()
    }

    #[must_use]
    pub fn total_rejected(&self) -> u64 {
        InstructionKind::ALL
            .iter()
            .map(|kind| self.get(*kind).rejected)
            .sum()
    }
}

#[derive(Default)]
struct Slot {
    committed: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

impl Slot {
    fn snapshot(&self) -> InstructionStats {
        InstructionStats {
            committed: self.committed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Lock-free recorder owned by the service.
#[derive(Default)]
pub(crate) struct StatsRecorder {
    slots: [Slot; 4],
}

impl StatsRecorder {
    fn slot(&self, kind: InstructionKind) -> &Slot {
        let index = match kind {
            InstructionKind::InitCounter => 0,
            InstructionKind::Harvest => 1,
            InstructionKind::Process => 2,
            InstructionKind::Distribute => 3,
        };
        &self.slots[index]
    }

    pub(crate) fn record<T>(&self, kind: InstructionKind, result: &Result<T, LedgerError>) {
        let slot = self.slot(kind);
        let counter = match result {
            Ok(_) => &slot.committed,
            Err(e) if e.is_precondition() => &slot.rejected,
            Err(_) => &slot.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> LedgerStats {
        LedgerStats {
            init_counter: self.slot(InstructionKind::InitCounter).snapshot(),
            harvest: self.slot(InstructionKind::Harvest).snapshot(),
            process: self.slot(InstructionKind::Process).snapshot(),
            distribute: self.slot(InstructionKind::Distribute).snapshot(),
        }
    }
}
