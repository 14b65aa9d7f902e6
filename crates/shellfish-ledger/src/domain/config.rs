//! # Ledger Configuration
//!
//! Text field bounds and service settings.
//!
//! Lengths are measured in UTF-8 bytes, which is what ends up in the stored
//! record.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default maximum byte length of `species`.
pub const DEFAULT_MAX_SPECIES_LEN: usize = 64;
/// Default maximum byte length of `harvester`.
pub const DEFAULT_MAX_HARVESTER_LEN: usize = 64;
/// Default maximum byte length of `harvest_location`.
pub const DEFAULT_MAX_LOCATION_LEN: usize = 128;
/// Default maximum byte length of processing and distribution details.
pub const DEFAULT_MAX_DETAILS_LEN: usize = 256;

/// Default capacity of the event broadcast channel.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// A bounded text field on a batch record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Species,
    Harvester,
    HarvestLocation,
    ProcessingDetails,
    DistributionDetails,
}

impl TextField {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Species => "species",
            TextField::Harvester => "harvester",
            TextField::HarvestLocation => "harvest_location",
            TextField::ProcessingDetails => "processing_details",
            TextField::DistributionDetails => "distribution_details",
        }
    }

    /// Whether an empty value is rejected.
    ///
    /// Harvest fields identify the lot and must be present. Detail strings are
    /// free text and may be empty.
    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            TextField::Species | TextField::Harvester | TextField::HarvestLocation
        )
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a text field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputViolation {
    Empty,
    TooLong { len: usize, max: usize },
}

impl fmt::Display for InputViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputViolation::Empty => write!(f, "must not be empty"),
            InputViolation::TooLong { len, max } => {
                write!(f, "{} bytes exceeds maximum of {}", len, max)
            }
        }
    }
}

/// Per-field maximum byte lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLimits {
    pub max_species_len: usize,
    pub max_harvester_len: usize,
    pub max_location_len: usize,
    pub max_details_len: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            max_species_len: DEFAULT_MAX_SPECIES_LEN,
            max_harvester_len: DEFAULT_MAX_HARVESTER_LEN,
            max_location_len: DEFAULT_MAX_LOCATION_LEN,
            max_details_len: DEFAULT_MAX_DETAILS_LEN,
        }
    }
}

impl FieldLimits {
    #[must_use]
    pub fn max_len(&self, field: TextField) -> usize {
        match field {
            TextField::Species => self.max_species_len,
            TextField::Harvester => self.max_harvester_len,
            TextField::HarvestLocation => self.max_location_len,
            TextField::ProcessingDetails | TextField::DistributionDetails => self.max_details_len,
        }
    }

    /// Check a value against this field's bound.
    pub fn check(&self, field: TextField, value: &str) -> Result<(), InputViolation> {
        if field.is_required() && value.is_empty() {
            return Err(InputViolation::Empty);
        }
        let max = self.max_len(field);
        if value.len() > max {
            return Err(InputViolation::TooLong {
                len: value.len(),
                max,
            });
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("maximum length for {0} must be greater than zero")]
    ZeroLimit(TextField),

    #[error("event channel capacity must be greater than zero")]
    ZeroEventCapacity,
}

/// Ledger service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Text field bounds.
    pub limits: FieldLimits,
    /// Capacity used when the runtime builds a broadcast event sink.
    pub event_channel_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            limits: FieldLimits::default(),
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for field in [
            TextField::Species,
            TextField::Harvester,
            TextField::HarvestLocation,
            TextField::ProcessingDetails,
        ] {
            if self.limits.max_len(field) == 0 {
                return Err(ConfigError::ZeroLimit(field));
            }
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        Ok(())
    }
}
