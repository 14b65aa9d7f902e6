//! # Service Helpers
//!
//! Account encoding, verified reads, validation and the common run wrapper.

use super::staging::StagedCommit;
use super::*;
use crate::domain::account::{AccountEnvelope, AccountKind};
use crate::domain::address::Address;
use crate::domain::config::TextField;
use crate::domain::entities::{BatchRecord, Counter};
use crate::domain::errors::{AccountRef, LedgerError};
use crate::domain::events::LedgerEvent;
use crate::domain::instruction::InstructionKind;
use crate::domain::keys::KeyPrefix;
use crate::domain::receipts::CommitId;
use tracing::{debug, error, warn};

impl<KV, CS, TS, AS, EV> ShellfishLedgerService<KV, CS, TS, AS, EV>
where
    KV: KeyValueStore,
    CS: ChecksumProvider,
    TS: TimeSource,
    AS: AccountSerializer,
    EV: LedgerEventSink,
{
    /// Run one operation while holding `keys`, then record and log the result.
    pub(crate) fn run<T>(
        &self,
        kind: InstructionKind,
        keys: Vec<Vec<u8>>,
        op: impl FnOnce() -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let result = {
            let _guard = self.kv_store.key_locks().acquire(&keys);
            op()
        };

        self.stats.record(kind, &result);
        if let Err(e) = &result {
            if e.is_precondition() {
                warn!(
                    instruction = %kind,
                    code = e.code(),
                    error = %e,
                    "[ledger] Operation rejected"
                );
            } else {
                error!(
                    instruction = %kind,
                    code = e.code(),
                    error = %e,
                    "[ledger] Operation failed"
                );
            }
        }
        result
    }

    pub(crate) fn validate_field(&self, field: TextField, value: &str) -> Result<(), LedgerError> {
        self.config
            .limits
            .check(field, value)
            .map_err(|violation| LedgerError::InvalidInput { field, violation })
    }

    pub(crate) fn encode_counter(&self, counter: &Counter) -> Result<Vec<u8>, LedgerError> {
        let payload = self.serializer.serialize_counter(counter)?;
        let checksum = self.checksum.compute_crc32(&payload);
        Ok(AccountEnvelope::encode(
            AccountKind::Counter,
            checksum,
            &payload,
        ))
    }

    pub(crate) fn encode_batch(&self, batch: &BatchRecord) -> Result<Vec<u8>, LedgerError> {
        let payload = self.serializer.serialize_batch(batch)?;
        let checksum = self.checksum.compute_crc32(&payload);
        Ok(AccountEnvelope::encode(AccountKind::Batch, checksum, &payload))
    }

    /// Unwrap an envelope and verify kind and checksum.
    fn open_envelope<'a>(
        &self,
        bytes: &'a [u8],
        kind: AccountKind,
        account: AccountRef,
    ) -> Result<&'a [u8], LedgerError> {
        let corrupt = |reason: String| LedgerError::DataCorruption { account, reason };

        let envelope =
            AccountEnvelope::decode(bytes, kind).map_err(|e| corrupt(e.to_string()))?;
        envelope
            .verify(self.checksum.compute_crc32(envelope.payload))
            .map_err(|e| corrupt(e.to_string()))?;
        Ok(envelope.payload)
    }

    /// Read the counter, `None` if it was never initialized.
    pub(crate) fn load_counter(&self) -> Result<Option<Counter>, LedgerError> {
        let Some(bytes) = self.kv_store.get(&KeyPrefix::counter_key())? else {
            return Ok(None);
        };
        let payload = self.open_envelope(&bytes, AccountKind::Counter, AccountRef::Counter)?;
        let counter = self
            .serializer
            .deserialize_counter(payload)
            .map_err(|e| LedgerError::DataCorruption {
                account: AccountRef::Counter,
                reason: e.to_string(),
            })?;
        Ok(Some(counter))
    }

    /// Read the batch stored at `address`, `None` if the slot is empty.
    ///
    /// The record's id must derive back to `address`.
    pub(crate) fn load_batch(
        &self,
        address: &Address,
        account: AccountRef,
    ) -> Result<Option<BatchRecord>, LedgerError> {
        let Some(bytes) = self.kv_store.get(&KeyPrefix::batch_key(address))? else {
            return Ok(None);
        };
        let payload = self.open_envelope(&bytes, AccountKind::Batch, account)?;
        let record = self.decode_batch(payload, account)?;

        if Address::batch(record.batch_id) != *address {
            return Err(LedgerError::DataCorruption {
                account,
                reason: format!("record id {} does not match its address", record.batch_id),
            });
        }
        Ok(Some(record))
    }

    /// Decode a stored batch value found by scanning.
    pub(crate) fn decode_stored_batch(
        &self,
        key: &[u8],
        bytes: &[u8],
    ) -> Result<BatchRecord, LedgerError> {
        let account = match key
            .strip_prefix(KeyPrefix::Batch.as_bytes())
            .and_then(|suffix| <[u8; 32]>::try_from(suffix).ok())
        {
            Some(raw) => AccountRef::Address(Address::new(raw)),
            None => {
                return Err(LedgerError::DataCorruption {
                    account: AccountRef::Address(Address::ZERO),
                    reason: format!("malformed batch key of {} bytes", key.len()),
                })
            }
        };
        let payload = self.open_envelope(bytes, AccountKind::Batch, account)?;
        self.decode_batch(payload, account)
    }

    fn decode_batch(&self, payload: &[u8], account: AccountRef) -> Result<BatchRecord, LedgerError> {
        self.serializer
            .deserialize_batch(payload)
            .map_err(|e| LedgerError::DataCorruption {
                account,
                reason: e.to_string(),
            })
    }

    /// Commit staged writes and log the commit.
    pub(crate) fn commit(
        &self,
        kind: InstructionKind,
        staged: StagedCommit,
    ) -> Result<CommitId, LedgerError> {
        let writes = staged.len();
        let commit_id = staged.commit(&self.kv_store)?;
        debug!(instruction = %kind, %commit_id, writes, "[ledger] Commit applied");
        Ok(commit_id)
    }

    /// Publish after commit. Failures are logged and otherwise ignored.
    pub(crate) fn publish(&self, event: LedgerEvent) {
        let event_type = event.event_type();
        let commit_id = event.commit_id();
        if let Err(e) = self.events.publish(event) {
            warn!(
                event_type,
                %commit_id,
                error = %e,
                "[ledger] Event publish failed; commit stands"
            );
        }
    }
}
