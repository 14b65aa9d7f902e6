//! # Authority Guard
//!
//! Only the identity recorded at harvest may drive a batch's later
//! transitions. The check is plain equality on the already verified identity.

use super::address::Identity;
use super::entities::BatchRecord;
use super::errors::LedgerError;

/// Reject `caller` unless it is the batch's authority.
pub fn ensure_authority(record: &BatchRecord, caller: &Identity) -> Result<(), LedgerError> {
    if record.authority == *caller {
        Ok(())
    } else {
        Err(LedgerError::Unauthorized {
            batch_id: record.batch_id,
            caller: *caller,
        })
    }
}
