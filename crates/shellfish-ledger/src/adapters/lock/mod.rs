//! # Data Directory Locking
//!
//! Keeps two processes from opening the same ledger directory. The file store
//! rewrites its file on every commit, so a second writer would silently lose
//! the first one's commits.
//!
//! - `flock`: the lock itself, using fs2
//! - `security`: timeouts and stale-holder detection

mod flock;
mod security;

pub use flock::{DatabaseLock, LockError};
pub use security::DEFAULT_LOCK_TIMEOUT;
