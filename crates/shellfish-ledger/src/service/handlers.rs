//! # Instruction Handlers
//!
//! One handler per operation. Handlers run with their keys already held (see
//! `ShellfishLedgerService::run`) and do a bounded amount of work: at most two
//! reads, one staged commit and one event.

use super::staging::StagedCommit;
use super::*;
use crate::domain::address::{Address, Identity};
use crate::domain::authority::ensure_authority;
use crate::domain::config::TextField;
use crate::domain::entities::{BatchId, BatchRecord, Counter, HarvestRequest};
use crate::domain::errors::{AccountRef, LedgerError};
use crate::domain::events::LedgerEvent;
use crate::domain::instruction::InstructionKind;
use crate::domain::keys::KeyPrefix;
use crate::domain::receipts::{CommitId, HarvestReceipt};
use tracing::info;

impl<KV, CS, TS, AS, EV> ShellfishLedgerService<KV, CS, TS, AS, EV>
where
    KV: KeyValueStore,
    CS: ChecksumProvider,
    TS: TimeSource,
    AS: AccountSerializer,
    EV: LedgerEventSink,
{
    pub(crate) fn handle_init_counter(&self) -> Result<CommitId, LedgerError> {
        let address = Address::counter();
        let key = KeyPrefix::counter_key();

        if self.kv_store.exists(&key)? {
            return Err(LedgerError::AlreadyInitialized { address });
        }

        let mut staged = StagedCommit::new();
        staged.put(key, self.encode_counter(&Counter::new())?);
        let commit_id = self.commit(InstructionKind::InitCounter, staged)?;

        info!(%commit_id, %address, "[ledger] Counter initialized");
        self.publish(LedgerEvent::CounterInitialized { commit_id, address });
        Ok(commit_id)
    }

    pub(crate) fn handle_harvest(
        &self,
        caller: &Identity,
        request: HarvestRequest,
    ) -> Result<HarvestReceipt, LedgerError> {
        let mut counter = self.load_counter()?.ok_or(LedgerError::NotFound {
            account: AccountRef::Counter,
        })?;

        self.validate_field(TextField::Species, &request.species)?;
        self.validate_field(TextField::Harvester, &request.harvester)?;
        self.validate_field(TextField::HarvestLocation, &request.harvest_location)?;

        let batch_id = counter.allocate()?;
        let address = Address::batch(batch_id);
        let batch_key = KeyPrefix::batch_key(&address);

        // Ids below the counter are taken; one at the counter never is
        if self.kv_store.exists(&batch_key)? {
            return Err(LedgerError::DataCorruption {
                account: AccountRef::Batch(batch_id),
                reason: "account for the next batch id is already occupied".to_string(),
            });
        }

        let harvest_time = self.time_source.now();
        let record = BatchRecord::harvested(batch_id, request, harvest_time, *caller);

        let mut staged = StagedCommit::new();
        staged.put(KeyPrefix::counter_key(), self.encode_counter(&counter)?);
        staged.put(batch_key, self.encode_batch(&record)?);
        let commit_id = self.commit(InstructionKind::Harvest, staged)?;

        info!(
            batch_id,
            %commit_id,
            authority = %caller,
            "[ledger] 🦪 Harvested shellfish batch with id: {}",
            batch_id
        );
        self.publish(LedgerEvent::BatchHarvested {
            commit_id,
            batch_id,
            address,
            species: record.species,
            authority: *caller,
            harvest_time,
            counter: counter.count,
        });

        Ok(HarvestReceipt {
            commit_id,
            batch_id,
            address,
        })
    }

    /// Load a batch for a transition: existence, then authority.
    fn load_owned_batch(
        &self,
        caller: &Identity,
        batch_id: BatchId,
    ) -> Result<BatchRecord, LedgerError> {
        let account = AccountRef::Batch(batch_id);
        let record = self
            .load_batch(&Address::batch(batch_id), account)?
            .ok_or(LedgerError::NotFound { account })?;
        ensure_authority(&record, caller)?;
        Ok(record)
    }

    pub(crate) fn handle_process(
        &self,
        caller: &Identity,
        batch_id: BatchId,
        processing_details: &str,
    ) -> Result<CommitId, LedgerError> {
        let mut record = self.load_owned_batch(caller, batch_id)?;

        // Mutates a local copy; the stored record changes only on commit
        record.mark_processed(processing_details)?;
        self.validate_field(TextField::ProcessingDetails, &record.processing_details)?;

        let mut staged = StagedCommit::new();
        staged.put(KeyPrefix::batch_id_key(batch_id), self.encode_batch(&record)?);
        let commit_id = self.commit(InstructionKind::Process, staged)?;

        info!(
            batch_id,
            %commit_id,
            "[ledger] 🏭 Processed shellfish batch with id: {}",
            batch_id
        );
        self.publish(LedgerEvent::BatchProcessed {
            commit_id,
            batch_id,
            authority: record.authority,
        });
        Ok(commit_id)
    }

    pub(crate) fn handle_distribute(
        &self,
        caller: &Identity,
        batch_id: BatchId,
        distribution_details: &str,
    ) -> Result<CommitId, LedgerError> {
        let mut record = self.load_owned_batch(caller, batch_id)?;

        record.mark_distributed(distribution_details)?;
        self.validate_field(TextField::DistributionDetails, &record.distribution_details)?;

        let mut staged = StagedCommit::new();
        staged.put(KeyPrefix::batch_id_key(batch_id), self.encode_batch(&record)?);
        let commit_id = self.commit(InstructionKind::Distribute, staged)?;

        info!(
            batch_id,
            %commit_id,
            "[ledger] 🚚 Distributed shellfish batch with id: {}",
            batch_id
        );
        self.publish(LedgerEvent::BatchDistributed {
            commit_id,
            batch_id,
            authority: record.authority,
        });
        Ok(commit_id)
    }
}
