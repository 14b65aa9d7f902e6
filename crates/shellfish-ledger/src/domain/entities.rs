//! # Domain Entities
//!
//! The two persisted account types: the sequence [`Counter`] and one
//! [`BatchRecord`] per harvest lot.

use super::address::Identity;
use super::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unix timestamp in seconds. Signed, matching a host clock that may report
/// pre-epoch values.
pub type Timestamp = i64;

/// Sequence number identifying a batch.
pub type BatchId = u64;

/// The singleton sequence counter.
///
/// `count` is the id the next harvest receives. It never decreases and only
/// moves by one per committed harvest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub count: u64,
}

impl Counter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the current value as a new batch id and advance by one.
    ///
    /// The caller holds the counter key and stages the updated counter in the
    /// same commit as the new batch.
    pub fn allocate(&mut self) -> Result<BatchId, LedgerError> {
        let id = self.count;
        self.count = id
            .checked_add(1)
            .ok_or(LedgerError::CounterOverflow { count: id })?;
        Ok(id)
    }
}

/// Lifecycle position of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BatchState {
    Harvested,
    Processed,
    Distributed,
}

impl BatchState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchState::Harvested => "harvested",
            BatchState::Processed => "processed",
            BatchState::Distributed => "distributed",
        }
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for a harvest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestRequest {
    pub species: String,
    pub harvester: String,
    pub harvest_location: String,
}

impl HarvestRequest {
    pub fn new(
        species: impl Into<String>,
        harvester: impl Into<String>,
        harvest_location: impl Into<String>,
    ) -> Self {
        Self {
            species: species.into(),
            harvester: harvester.into(),
            harvest_location: harvest_location.into(),
        }
    }
}

/// One harvest lot.
///
/// Field order is the persisted order: id, three harvest strings, harvest
/// time, the two lifecycle flags, two detail strings, authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_id: BatchId,
    pub species: String,
    pub harvester: String,
    pub harvest_location: String,
    pub harvest_time: Timestamp,
    pub is_processed: bool,
    pub is_distributed: bool,
    pub processing_details: String,
    pub distribution_details: String,
    pub authority: Identity,
}

impl BatchRecord {
    /// A freshly harvested batch owned by `authority`.
    #[must_use]
    pub fn harvested(
        batch_id: BatchId,
        request: HarvestRequest,
        harvest_time: Timestamp,
        authority: Identity,
    ) -> Self {
        Self {
            batch_id,
            species: request.species,
            harvester: request.harvester,
            harvest_location: request.harvest_location,
            harvest_time,
            is_processed: false,
            is_distributed: false,
            processing_details: String::new(),
            distribution_details: String::new(),
            authority,
        }
    }

    #[must_use]
    pub fn state(&self) -> BatchState {
        if self.is_distributed {
            BatchState::Distributed
        } else if self.is_processed {
            BatchState::Processed
        } else {
            BatchState::Harvested
        }
    }

    /// Harvested -> Processed.
    pub fn mark_processed(&mut self, details: impl Into<String>) -> Result<(), LedgerError> {
        if self.is_processed {
            return Err(LedgerError::AlreadyProcessed {
                batch_id: self.batch_id,
            });
        }
        self.is_processed = true;
        self.processing_details = details.into();
        Ok(())
    }

    /// Processed -> Distributed.
    pub fn mark_distributed(&mut self, details: impl Into<String>) -> Result<(), LedgerError> {
        if !self.is_processed {
            return Err(LedgerError::NotProcessedYet {
                batch_id: self.batch_id,
            });
        }
        if self.is_distributed {
            return Err(LedgerError::AlreadyDistributed {
                batch_id: self.batch_id,
            });
        }
        self.is_distributed = true;
        self.distribution_details = details.into();
        Ok(())
    }
}
