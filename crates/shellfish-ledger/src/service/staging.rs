//! # Staged Commits
//!
//! Handlers compute every write first and stage it here. Nothing touches the
//! store until [`StagedCommit::commit`], which hands the whole set to one
//! atomic batch write. Dropping an uncommitted stage discards it, which is
//! how a failing precondition rolls back.

use crate::domain::errors::KVStoreError;
use crate::domain::receipts::CommitId;
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub(crate) struct StagedCommit {
    writes: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl StagedCommit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stage a write. A later write to the same key replaces the earlier one.
    pub(crate) fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.writes.insert(key, value);
    }

    pub(crate) fn len(&self) -> usize {
        self.writes.len()
    }

    /// Apply every staged write as one batch.
    pub(crate) fn commit<KV: KeyValueStore>(self, store: &KV) -> Result<CommitId, KVStoreError> {
        let operations: Vec<BatchOperation> = self
            .writes
            .into_iter()
            .map(|(key, value)| BatchOperation::put(key, value))
            .collect();
        store.atomic_batch_write(operations)?;
        Ok(CommitId::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryKVStore;

    #[test]
    fn test_commit_applies_all_writes() {
        let store = InMemoryKVStore::new();
        let mut staged = StagedCommit::new();
        staged.put(b"c:1".to_vec(), b"counter".to_vec());
        staged.put(b"b:1".to_vec(), b"batch".to_vec());
        assert_eq!(staged.len(), 2);

        staged.commit(&store).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_dropped_stage_writes_nothing() {
        let store = InMemoryKVStore::new();
        {
            let mut staged = StagedCommit::new();
            staged.put(b"c:1".to_vec(), b"counter".to_vec());
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_later_write_replaces_earlier() {
        let store = InMemoryKVStore::new();
        let mut staged = StagedCommit::new();
        staged.put(b"k".to_vec(), b"old".to_vec());
        staged.put(b"k".to_vec(), b"new".to_vec());
        assert_eq!(staged.len(), 1);

        staged.commit(&store).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"new".to_vec()));
    }
}
