//! # Account Envelope
//!
//! Every stored value is wrapped as:
//!
//! ```text
//! [kind: u8][checksum: u32 LE][payload...]
//! ```
//!
//! The kind tag stops a batch from being read as a counter and the checksum
//! covers the payload bytes. Both are checked on every read.

use std::fmt;
use thiserror::Error;

/// Header size in bytes.
pub const ENVELOPE_HEADER_LEN: usize = 5;

/// Discriminator for stored accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AccountKind {
    Counter = 1,
    Batch = 2,
}

impl AccountKind {
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(AccountKind::Counter),
            2 => Some(AccountKind::Batch),
            _ => None,
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Counter => write!(f, "counter"),
            AccountKind::Batch => write!(f, "batch"),
        }
    }
}

/// Envelope decode failures. Always surfaced as data corruption.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("envelope truncated: {len} bytes")]
    Truncated { len: usize },

    #[error("unknown account kind tag {0}")]
    UnknownKind(u8),

    #[error("expected {expected} account, found {found}")]
    KindMismatch {
        expected: AccountKind,
        found: AccountKind,
    },

    #[error("checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },
}

/// A decoded envelope borrowing its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountEnvelope<'a> {
    pub kind: AccountKind,
    pub checksum: u32,
    pub payload: &'a [u8],
}

impl<'a> AccountEnvelope<'a> {
    /// Wrap a payload with its kind and checksum.
    pub fn encode(kind: AccountKind, checksum: u32, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(ENVELOPE_HEADER_LEN + payload.len());
        bytes.push(kind as u8);
        bytes.extend_from_slice(&checksum.to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    /// Split stored bytes into header and payload, checking the kind tag.
    pub fn decode(bytes: &'a [u8], expected: AccountKind) -> Result<Self, EnvelopeError> {
        if bytes.len() < ENVELOPE_HEADER_LEN {
            return Err(EnvelopeError::Truncated { len: bytes.len() });
        }
        let kind = AccountKind::from_u8(bytes[0]).ok_or(EnvelopeError::UnknownKind(bytes[0]))?;
        if kind != expected {
            return Err(EnvelopeError::KindMismatch {
                expected,
                found: kind,
            });
        }
        let mut checksum = [0u8; 4];
        checksum.copy_from_slice(&bytes[1..ENVELOPE_HEADER_LEN]);
        Ok(Self {
            kind,
            checksum: u32::from_le_bytes(checksum),
            payload: &bytes[ENVELOPE_HEADER_LEN..],
        })
    }

    /// Compare the stored checksum against one computed over the payload.
    pub fn verify(&self, computed: u32) -> Result<(), EnvelopeError> {
        if self.checksum == computed {
            Ok(())
        } else {
            Err(EnvelopeError::ChecksumMismatch {
                stored: self.checksum,
                computed,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_layout() {
        let bytes = AccountEnvelope::encode(AccountKind::Batch, 0xDEADBEEF, b"payload");
        assert_eq!(bytes[0], 2);
        assert_eq!(&bytes[1..5], &0xDEADBEEFu32.to_le_bytes());
        assert_eq!(&bytes[5..], b"payload");

        let envelope = AccountEnvelope::decode(&bytes, AccountKind::Batch).unwrap();
        assert_eq!(envelope.payload, b"payload");
        assert!(envelope.verify(0xDEADBEEF).is_ok());
    }

    #[test]
    fn test_envelope_rejects_wrong_kind() {
        let bytes = AccountEnvelope::encode(AccountKind::Counter, 1, &[0; 8]);
        assert_eq!(
            AccountEnvelope::decode(&bytes, AccountKind::Batch),
            Err(EnvelopeError::KindMismatch {
                expected: AccountKind::Batch,
                found: AccountKind::Counter
            })
        );
    }

    #[test]
    fn test_envelope_rejects_truncated_and_unknown() {
        assert_eq!(
            AccountEnvelope::decode(&[1, 0, 0], AccountKind::Counter),
            Err(EnvelopeError::Truncated { len: 3 })
        );
        assert_eq!(
            AccountEnvelope::decode(&[9, 0, 0, 0, 0], AccountKind::Counter),
            Err(EnvelopeError::UnknownKind(9))
        );
    }

    #[test]
    fn test_checksum_mismatch() {
        let bytes = AccountEnvelope::encode(AccountKind::Counter, 5, &[0; 8]);
        let envelope = AccountEnvelope::decode(&bytes, AccountKind::Counter).unwrap();
        assert!(matches!(
            envelope.verify(6),
            Err(EnvelopeError::ChecksumMismatch {
                stored: 5,
                computed: 6
            })
        ));
    }
}
