//! # Wallet
//!
//! The caller identity used as batch authority, kept as 64 hex characters in
//! a file. Created with random bytes on first use.

use rand::RngCore;
use shellfish_ledger::domain::address::HexParseError;
use shellfish_ledger::Identity;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("wallet file {path} does not hold a 32-byte hex identity: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: HexParseError,
    },
}

/// Read the identity at `path`, creating a fresh one if the file is missing.
pub fn load_or_create_identity(path: &Path) -> Result<Identity, WalletError> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            contents
                .trim()
                .parse()
                .map_err(|source| WalletError::Malformed {
                    path: path.to_path_buf(),
                    source,
                })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => create_identity(path),
        Err(source) => Err(WalletError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn create_identity(path: &Path) -> Result<Identity, WalletError> {
    let io_err = |source| WalletError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let identity = Identity::new(bytes);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, format!("{}\n", identity.to_hex())).map_err(io_err)?;

    info!(path = %path.display(), identity = %identity, "Created new wallet");
    Ok(identity)
}
