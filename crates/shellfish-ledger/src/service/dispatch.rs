//! # Instruction Dispatcher
//!
//! Implements [`ShellfishLedgerApi`]: every mutating entry point holds the
//! keys its instruction declares for the duration of its handler.

use super::*;
use crate::domain::address::{Address, Identity};
use crate::domain::entities::{BatchId, BatchRecord, Counter, HarvestRequest};
use crate::domain::errors::LedgerError;
use crate::domain::instruction::{Instruction, InstructionKind, Outcome};
use crate::domain::keys::KeyPrefix;
use crate::domain::receipts::{CommitId, HarvestReceipt};
use crate::ports::inbound::ShellfishLedgerApi;

impl<KV, CS, TS, AS, EV> ShellfishLedgerApi for ShellfishLedgerService<KV, CS, TS, AS, EV>
where
    KV: KeyValueStore,
    CS: ChecksumProvider,
    TS: TimeSource,
    AS: AccountSerializer,
    EV: LedgerEventSink,
{
    fn init_counter(&self) -> Result<CommitId, LedgerError> {
        self.run(
            InstructionKind::InitCounter,
            vec![KeyPrefix::counter_key()],
            || self.handle_init_counter(),
        )
    }

    fn harvest(
        &self,
        caller: &Identity,
        request: HarvestRequest,
    ) -> Result<HarvestReceipt, LedgerError> {
        self.run(
            InstructionKind::Harvest,
            vec![KeyPrefix::counter_key()],
            || self.handle_harvest(caller, request),
        )
    }

    fn process(
        &self,
        caller: &Identity,
        batch_id: BatchId,
        processing_details: &str,
    ) -> Result<CommitId, LedgerError> {
        self.run(
            InstructionKind::Process,
            vec![KeyPrefix::batch_id_key(batch_id)],
            || self.handle_process(caller, batch_id, processing_details),
        )
    }

    fn distribute(
        &self,
        caller: &Identity,
        batch_id: BatchId,
        distribution_details: &str,
    ) -> Result<CommitId, LedgerError> {
        self.run(
            InstructionKind::Distribute,
            vec![KeyPrefix::batch_id_key(batch_id)],
            || self.handle_distribute(caller, batch_id, distribution_details),
        )
    }

    fn dispatch(
        &self,
        caller: &Identity,
        instruction: Instruction,
    ) -> Result<Outcome, LedgerError> {
        let kind = instruction.kind();
        let keys = instruction.touched_keys();

        match instruction {
            Instruction::InitCounter => self
                .run(kind, keys, || self.handle_init_counter())
                .map(|commit_id| Outcome::CounterInitialized { commit_id }),
            Instruction::Harvest {
                species,
                harvester,
                harvest_location,
            } => {
                let request = HarvestRequest {
                    species,
                    harvester,
                    harvest_location,
                };
                self.run(kind, keys, || self.handle_harvest(caller, request))
                    .map(Outcome::Harvested)
            }
            Instruction::Process {
                batch_id,
                processing_details,
            } => self
                .run(kind, keys, || {
                    self.handle_process(caller, batch_id, &processing_details)
                })
                .map(|commit_id| Outcome::Processed {
                    commit_id,
                    batch_id,
                }),
            Instruction::Distribute {
                batch_id,
                distribution_details,
            } => self
                .run(kind, keys, || {
                    self.handle_distribute(caller, batch_id, &distribution_details)
                })
                .map(|commit_id| Outcome::Distributed {
                    commit_id,
                    batch_id,
                }),
        }
    }

    fn fetch_counter(&self) -> Result<Counter, LedgerError> {
        self.query_counter()
    }

    fn fetch_batch(&self, batch_id: BatchId) -> Result<BatchRecord, LedgerError> {
        self.query_batch(batch_id)
    }

    fn fetch_batch_at(&self, address: &Address) -> Result<BatchRecord, LedgerError> {
        self.query_batch_at(address)
    }

    fn list_batches(&self) -> Result<Vec<BatchRecord>, LedgerError> {
        self.query_all_batches()
    }

    fn stats(&self) -> LedgerStats {
        self.stats.snapshot()
    }
}
