//! # Runtime Configuration
//!
//! Loaded from environment variables, then overridden by CLI flags.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SF_DATA_DIR` | `./data` | Directory holding the store and its lock |
//! | `SF_BACKEND` | `file` | `file`, `memory` or `rocksdb` |
//! | `SF_WALLET` | `<data_dir>/wallet.hex` | Caller identity file |
//! | `SF_LOCK_TIMEOUT_SECS` | `30` | How long to wait for the data directory lock |
//! | `SF_MAX_SPECIES_LEN` | `64` | Byte limit for `species` |
//! | `SF_MAX_NAME_LEN` | `64` | Byte limit for `harvester` |
//! | `SF_MAX_LOCATION_LEN` | `128` | Byte limit for `harvest_location` |
//! | `SF_MAX_DETAILS_LEN` | `256` | Byte limit for processing and distribution details |

use shellfish_ledger::adapters::lock::DEFAULT_LOCK_TIMEOUT;
use shellfish_ledger::domain::config::ConfigError;
use shellfish_ledger::LedgerConfig;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default data directory.
pub const DEFAULT_DATA_DIR: &str = "./data";
/// File name of the file-backed store inside the data directory.
pub const STORE_FILE_NAME: &str = "ledger.db";
/// Directory name of the RocksDB store inside the data directory.
pub const ROCKSDB_DIR_NAME: &str = "rocksdb";
/// File name of the default wallet inside the data directory.
pub const WALLET_FILE_NAME: &str = "wallet.hex";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("unknown storage backend '{0}' (expected file, memory or rocksdb)")]
    UnknownBackend(String),

    #[error("storage backend '{0}' is not compiled in; rebuild with --features {0}")]
    BackendUnavailable(StorageBackend),

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("invalid ledger configuration: {0}")]
    Ledger(#[from] ConfigError),
}

/// Storage backend for ledger accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; nothing survives exit.
    Memory,
    /// Single file with atomic replace on every commit.
    File,
    /// RocksDB, with the `rocksdb` feature.
    RocksDb,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File => "file",
            StorageBackend::RocksDb => "rocksdb",
        }
    }

    /// Whether the backend writes under the data directory.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, StorageBackend::Memory)
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = RuntimeConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "rocksdb" | "rocks" => Ok(StorageBackend::RocksDb),
            other => Err(RuntimeConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    /// Wallet file; `None` means `<data_dir>/wallet.hex`.
    pub wallet_path: Option<PathBuf>,
    pub lock_timeout: Duration,
    pub ledger: LedgerConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            backend: StorageBackend::File,
            wallet_path: None,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            ledger: LedgerConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, RuntimeConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuntimeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("SF_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = lookup("SF_BACKEND") {
            config.backend = backend.parse()?;
        }
        if let Some(wallet) = lookup("SF_WALLET") {
            config.wallet_path = Some(PathBuf::from(wallet));
        }
        if let Some(secs) = parse_positive(&lookup, "SF_LOCK_TIMEOUT_SECS")? {
            config.lock_timeout = Duration::from_secs(secs as u64);
        }

        let limits = &mut config.ledger.limits;
        if let Some(value) = parse_positive(&lookup, "SF_MAX_SPECIES_LEN")? {
            limits.max_species_len = value;
        }
        if let Some(value) = parse_positive(&lookup, "SF_MAX_NAME_LEN")? {
            limits.max_harvester_len = value;
        }
        if let Some(value) = parse_positive(&lookup, "SF_MAX_LOCATION_LEN")? {
            limits.max_location_len = value;
        }
        if let Some(value) = parse_positive(&lookup, "SF_MAX_DETAILS_LEN")? {
            limits.max_details_len = value;
        }

        Ok(config)
    }

    /// Check the configuration can be used to build a container.
    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        if self.backend == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(RuntimeConfigError::BackendUnavailable(self.backend));
        }
        self.ledger.validate()?;
        Ok(())
    }

    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }

    pub fn rocksdb_dir(&self) -> PathBuf {
        self.data_dir.join(ROCKSDB_DIR_NAME)
    }

    pub fn wallet_file(&self) -> PathBuf {
        self.wallet_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(WALLET_FILE_NAME))
    }
}

fn parse_positive<F>(lookup: &F, var: &'static str) -> Result<Option<usize>, RuntimeConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(RuntimeConfigError::InvalidNumber { var, value }),
        },
    }
}
