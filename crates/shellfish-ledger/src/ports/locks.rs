//! # Per-Key Lock Table
//!
//! An operation holds every key it touches for its whole run. Key sets are
//! taken all at once, so two operations can never each hold part of the
//! other's set and wait forever.
//!
//! Each store owns one table and hands it out through
//! [`KeyValueStore::key_locks`](super::outbound::KeyValueStore::key_locks),
//! so every service over the same store shares it.

use parking_lot::{Condvar, Mutex};
use std::collections::HashSet;

#[derive(Default)]
pub struct KeyLockTable {
    held: Mutex<HashSet<Vec<u8>>>,
    released: Condvar,
}

impl KeyLockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until none of `keys` is held, then hold all of them.
    pub fn acquire(&self, keys: &[Vec<u8>]) -> KeyGuard<'_> {
        let mut keys = keys.to_vec();
        keys.sort();
        keys.dedup();

        let mut held = self.held.lock();
        while keys.iter().any(|key| held.contains(key)) {
            self.released.wait(&mut held);
        }
        for key in &keys {
            held.insert(key.clone());
        }

        KeyGuard { table: self, keys }
    }

    /// Number of keys currently held.
    pub fn held_count(&self) -> usize {
        self.held.lock().len()
    }
}

/// Releases its keys on drop.
pub struct KeyGuard<'a> {
    table: &'a KeyLockTable,
    keys: Vec<Vec<u8>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        let mut held = self.table.held.lock();
        for key in &self.keys {
            held.remove(key);
        }
        drop(held);
        self.table.released.notify_all();
    }
}
