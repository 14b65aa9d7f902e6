//! # Read Queries
//!
//! Reads take no key locks. Each account changes through a single atomic
//! batch write, so a read sees a whole committed state of that account.

use super::*;
use crate::domain::address::Address;
use crate::domain::entities::{BatchId, BatchRecord, Counter};
use crate::domain::errors::{AccountRef, LedgerError};
use crate::domain::keys::KeyPrefix;

impl<KV, CS, TS, AS, EV> ShellfishLedgerService<KV, CS, TS, AS, EV>
where
    KV: KeyValueStore,
    CS: ChecksumProvider,
    TS: TimeSource,
    AS: AccountSerializer,
    EV: LedgerEventSink,
{
    pub(crate) fn query_counter(&self) -> Result<Counter, LedgerError> {
        self.load_counter()?.ok_or(LedgerError::NotFound {
            account: AccountRef::Counter,
        })
    }

    pub(crate) fn query_batch(&self, batch_id: BatchId) -> Result<BatchRecord, LedgerError> {
        let account = AccountRef::Batch(batch_id);
        self.load_batch(&Address::batch(batch_id), account)?
            .ok_or(LedgerError::NotFound { account })
    }

    pub(crate) fn query_batch_at(&self, address: &Address) -> Result<BatchRecord, LedgerError> {
        let account = AccountRef::Address(*address);
        self.load_batch(address, account)?
            .ok_or(LedgerError::NotFound { account })
    }

    pub(crate) fn query_all_batches(&self) -> Result<Vec<BatchRecord>, LedgerError> {
        let entries = self.kv_store.prefix_scan(KeyPrefix::Batch.as_bytes())?;

        let mut batches = entries
            .iter()
            .map(|(key, value)| self.decode_stored_batch(key, value))
            .collect::<Result<Vec<_>, _>>()?;
        batches.sort_by_key(|batch| batch.batch_id);
        Ok(batches)
    }
}
