//! # Persistence
//!
//! The runtime container over the file backend: state survives restarts,
//! damaged bytes surface as `DataCorruption`, and one process owns a data
//! directory at a time.

#[cfg(test)]
mod tests {
    use shellfish_ledger::prelude::*;
    use shellfish_ledger::test_utils::{alice, bob, clam_request, oyster_request};
    use shellfish_runtime::{LedgerContainer, RuntimeConfig, StorageBackend, Workflow};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::tempdir;

    fn config(dir: &Path) -> RuntimeConfig {
        RuntimeConfig {
            data_dir: dir.to_path_buf(),
            backend: StorageBackend::File,
            lock_timeout: Duration::from_millis(50),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn test_lifecycle_spans_restarts() {
        let dir = tempdir().unwrap();

        {
            let container = LedgerContainer::build(config(dir.path())).unwrap();
            let ledger = container.ledger();
            ledger.init_counter().unwrap();
            ledger.harvest(&alice(), oyster_request()).unwrap();
        }
        {
            let container = LedgerContainer::build(config(dir.path())).unwrap();
            let ledger = container.ledger();
            ledger.process(&alice(), 0, "Cleaned and packaged").unwrap();
            assert!(matches!(
                ledger.distribute(&bob(), 0, "hijack"),
                Err(LedgerError::Unauthorized { .. })
            ));
        }

        let container = LedgerContainer::build(config(dir.path())).unwrap();
        let ledger = container.ledger();
        ledger.distribute(&alice(), 0, "Shipped to buyer").unwrap();
        ledger.harvest(&bob(), clam_request()).unwrap();

        let batches = ledger.list_batches().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].state(), BatchState::Distributed);
        assert_eq!(batches[0].processing_details, "Cleaned and packaged");
        assert_eq!(batches[1].batch_id, 1);
        assert_eq!(ledger.fetch_counter().unwrap().count, 2);
    }

    #[test]
    fn test_flipped_byte_is_reported_as_corruption() {
        let dir = tempdir().unwrap();
        {
            let container = LedgerContainer::build(config(dir.path())).unwrap();
            let ledger = container.ledger();
            ledger.init_counter().unwrap();
            ledger.harvest(&alice(), oyster_request()).unwrap();
        }

        // The file ends with the payload of one of the two accounts.
        let store_file = config(dir.path()).store_file();
        let mut bytes = fs::read(&store_file).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        fs::write(&store_file, bytes).unwrap();

        let container = LedgerContainer::build(config(dir.path())).unwrap();
        let ledger = container.ledger();
        let counter = ledger.fetch_counter();
        let batch = ledger.fetch_batch(0);

        let corrupted = [counter.err(), batch.err()]
            .into_iter()
            .flatten()
            .filter(|e| matches!(e, LedgerError::DataCorruption { .. }))
            .count();
        assert_eq!(corrupted, 1);
        assert!(matches!(
            ledger.list_batches(),
            Ok(_) | Err(LedgerError::DataCorruption { .. })
        ));
    }

    #[test]
    fn test_data_directory_has_one_owner() {
        let dir = tempdir().unwrap();
        let first = LedgerContainer::build(config(dir.path())).unwrap();

        let refused = LedgerContainer::build(config(dir.path()));
        assert!(refused.is_err());

        drop(first);
        assert!(LedgerContainer::build(config(dir.path())).is_ok());
    }

    #[test]
    fn test_demo_twice_on_disk() {
        let dir = tempdir().unwrap();
        let now = chrono::Utc::now();

        for expected_batch in 0..2u64 {
            let container = LedgerContainer::build(config(dir.path())).unwrap();
            let ledger = container.ledger();
            let workflow = Workflow::new(ledger.as_ref(), alice());
            let report = workflow.run_demo(oyster_request(), now).unwrap();
            assert_eq!(report.receipt.batch_id, expected_batch);
            assert_eq!(report.counter_after, expected_batch + 1);
        }
    }
}
