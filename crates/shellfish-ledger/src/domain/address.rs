//! # Addresses and Identities
//!
//! Every persisted account lives at a 32-byte [`Address`]. The counter's
//! address is derived from fixed seeds, so any caller can compute it without a
//! lookup. Batch addresses are derived from the batch id the same way.
//!
//! An [`Identity`] is the caller's public identity. Signature checking happens
//! before the ledger is reached; here an identity is an opaque, already
//! verified 32-byte value compared by equality.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace mixed into every derived address.
pub const PROGRAM_NAMESPACE: &[u8] = b"shellfish-ledger/v1";

/// Seed for the singleton counter account.
pub const COUNTER_SEED: &[u8] = b"counter";

/// Seed prefix for batch accounts.
pub const BATCH_SEED: &[u8] = b"batch";

/// Error returned when parsing a hex-encoded address or identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexParseError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

fn parse_bytes32(s: &str) -> Result<[u8; 32], HexParseError> {
    let trimmed = s.trim().trim_start_matches("0x");
    let bytes = hex::decode(trimmed).map_err(|e| HexParseError::InvalidHex(e.to_string()))?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| HexParseError::InvalidLength(len))
}

/// Storage address of an account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    /// The all-zero address. Never produced by derivation in practice.
    pub const ZERO: Self = Self([0u8; 32]);

    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive an address from seeds under [`PROGRAM_NAMESPACE`].
    ///
    /// Each seed is length-prefixed so `["ab", "c"]` and `["a", "bc"]` never
    /// collide.
    #[must_use]
    pub fn derive(seeds: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(PROGRAM_NAMESPACE);
        for seed in seeds {
            hasher.update((seed.len() as u32).to_le_bytes());
            hasher.update(seed);
        }
        Self(hasher.finalize().into())
    }

    /// Well-known address of the counter singleton.
    #[must_use]
    pub fn counter() -> Self {
        Self::derive(&[COUNTER_SEED])
    }

    /// Address of the batch record with the given id.
    #[must_use]
    pub fn batch(batch_id: u64) -> Self {
        Self::derive(&[BATCH_SEED, &batch_id.to_le_bytes()])
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Address {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_bytes32(s).map(Self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}..)", hex::encode(&self.0[..4]))
    }
}

/// Caller identity, fixed on a batch as its authority.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity([u8; 32]);

impl Identity {
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Identity {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_bytes32(s).map(Self)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({}..)", hex::encode(&self.0[..4]))
    }
}
