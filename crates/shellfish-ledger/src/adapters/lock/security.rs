//! # Lock Security
//!
//! Timeouts and stale lock detection.

use std::path::Path;
use std::time::Duration;

/// Default time to wait for a lock held by another live process.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on the backoff between retries.
pub const MAX_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Checks if a process with the given PID is still running.
///
/// Used to break locks left behind by crashed processes.
pub fn is_process_running(pid: u32) -> bool {
    #[cfg(unix)]
    {
        Path::new(&format!("/proc/{}", pid)).exists()
    }

    #[cfg(not(unix))]
    {
        // Without /proc, assume the holder is alive
        let _ = pid;
        true
    }
}

/// Validates that a lock file path resolves inside the data directory.
pub fn validate_lock_path(data_dir: &Path, lock_path: &Path) -> bool {
    lock_path
        .canonicalize()
        .ok()
        .and_then(|canonical| {
            data_dir
                .canonicalize()
                .ok()
                .map(|data_canonical| canonical.starts_with(&data_canonical))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_process_running_self() {
        assert!(is_process_running(std::process::id()));
    }

    #[test]
    fn test_validate_lock_path() {
        let dir = tempfile::tempdir().unwrap();
        let inside = dir.path().join("LOCK");
        std::fs::write(&inside, b"1").unwrap();
        assert!(validate_lock_path(dir.path(), &inside));

        let other = tempfile::tempdir().unwrap();
        let outside = other.path().join("LOCK");
        std::fs::write(&outside, b"1").unwrap();
        assert!(!validate_lock_path(dir.path(), &outside));
    }
}
