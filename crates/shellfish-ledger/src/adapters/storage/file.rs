use super::memory::{apply_operations, scan_prefix};
use crate::domain::errors::KVStoreError;
use crate::ports::locks::KeyLockTable;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

/// File-backed key-value store.
///
/// Holds the map in memory and rewrites the whole file on each write, via a
/// temp file and rename so a crash leaves either the old or the new file.
/// Pair it with [`DatabaseLock`](crate::adapters::DatabaseLock) so only one
/// process owns the data directory.
pub struct FileBackedKVStore {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    path: PathBuf,
    locks: KeyLockTable,
}

impl FileBackedKVStore {
    /// Open the store at `path`, loading existing contents if the file exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let data = Self::load_from_file(&path)?;
            tracing::info!(
                "[ledger] 💾 Loaded {} keys from {}",
                data.len(),
                path.display()
            );
            data
        } else {
            tracing::info!("[ledger] 📁 No existing storage file at {}", path.display());
            HashMap::new()
        };

        Ok(Self {
            data: RwLock::new(data),
            path,
            locks: KeyLockTable::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_file(path: &Path) -> Result<HashMap<Vec<u8>, Vec<u8>>, KVStoreError> {
        let mut file = std::fs::File::open(path).map_err(io_error)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_error)?;

        // Format: [key_len:u32][key][value_len:u32][value]...
        let mut data = HashMap::new();
        let mut cursor = 0;

        while cursor < bytes.len() {
            let key = Self::read_chunk(&bytes, &mut cursor)?;
            let value = Self::read_chunk(&bytes, &mut cursor)?;
            data.insert(key, value);
        }

        Ok(data)
    }

    fn read_chunk(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, KVStoreError> {
        let truncated = || KVStoreError::CorruptionError {
            message: format!("storage file truncated at offset {}", cursor),
        };

        let len_end = cursor.checked_add(4).ok_or_else(truncated)?;
        let len_bytes: [u8; 4] = bytes
            .get(*cursor..len_end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(truncated)?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        let end = len_end.checked_add(len).ok_or_else(truncated)?;
        let chunk = bytes.get(len_end..end).ok_or_else(truncated)?.to_vec();
        *cursor = end;
        Ok(chunk)
    }

    fn save_to_file(&self, data: &HashMap<Vec<u8>, Vec<u8>>) -> Result<(), KVStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let mut bytes = Vec::new();
        for (key, value) in data {
            bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
            bytes.extend_from_slice(key);
            bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
            bytes.extend_from_slice(value);
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;

        std::fs::rename(&temp_path, &self.path).map_err(io_error)?;
        Ok(())
    }

    /// Apply operations to a copy, persist it, then swap it in. A failed
    /// write leaves both the file and the in-memory map unchanged.
    fn commit(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut data = self.data.write();
        let mut next = data.clone();
        apply_operations(&mut next, operations);
        self.save_to_file(&next)?;
        *data = next;
        Ok(())
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.commit(vec![BatchOperation::put(key, value)])
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.commit(vec![BatchOperation::delete(key)])
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.commit(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.read().contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(scan_prefix(&self.data.read(), prefix))
    }

    fn key_locks(&self) -> &KeyLockTable {
        &self.locks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        {
            let store = FileBackedKVStore::open(&path).unwrap();
            store
                .atomic_batch_write(vec![
                    BatchOperation::put(b"c:x".to_vec(), b"1".to_vec()),
                    BatchOperation::put(b"b:y".to_vec(), b"2".to_vec()),
                ])
                .unwrap();
        }

        let reopened = FileBackedKVStore::open(&path).unwrap();
        assert_eq!(reopened.get(b"c:x").unwrap(), Some(b"1".to_vec()));
        assert_eq!(reopened.get(b"b:y").unwrap(), Some(b"2".to_vec()));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBackedKVStore::open(dir.path().join("absent.db")).unwrap();
        assert!(store.prefix_scan(b"").unwrap().is_empty());
    }

    #[test]
    fn test_file_store_rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.db");
        // Key length says 10 bytes, only 2 follow
        let mut bytes = 10u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"ab");
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            FileBackedKVStore::open(&path),
            Err(KVStoreError::CorruptionError { .. })
        ));
    }

    #[test]
    fn test_failed_save_keeps_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let store = FileBackedKVStore::open(&path).unwrap();
        store.put(b"k", b"v1").unwrap();

        // A directory where the temp file should go makes the save fail
        std::fs::create_dir(path.with_extension("tmp")).unwrap();
        assert!(store.put(b"k", b"v2").is_err());
        assert_eq!(store.get(b"k").unwrap(), Some(b"v1".to_vec()));
    }
}
