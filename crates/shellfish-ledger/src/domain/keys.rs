//! # Storage Keys
//!
//! Key layout in the key-value store:
//!
//! | Prefix | Suffix | Value |
//! |--------|--------|-------|
//! | `c:` | counter address | counter envelope |
//! | `b:` | batch address | batch envelope |

use super::address::Address;

/// Key namespace for each account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Counter singleton: `c:{address}`
    Counter,
    /// Batch records: `b:{address}`
    Batch,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Counter => b"c:",
            KeyPrefix::Batch => b"b:",
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix);
        key
    }

    pub fn counter_key() -> Vec<u8> {
        KeyPrefix::Counter.key(Address::counter().as_bytes())
    }

    pub fn batch_key(address: &Address) -> Vec<u8> {
        KeyPrefix::Batch.key(address.as_bytes())
    }

    pub fn batch_id_key(batch_id: u64) -> Vec<u8> {
        Self::batch_key(&Address::batch(batch_id))
    }
}
