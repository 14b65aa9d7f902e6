//! # Concurrency
//!
//! One ledger shared across OS threads and tokio tasks. Harvests serialize on
//! the counter; transitions on different lots do not wait for each other.

#[cfg(test)]
mod tests {
    use shellfish_ledger::adapters::{
        BincodeAccountSerializer, Crc32ChecksumProvider, FileBackedKVStore, NoOpEventSink,
        SystemTimeSource,
    };
    use shellfish_ledger::prelude::*;
    use shellfish_ledger::test_utils::{alice, identity, oyster_request, TestLedger};
    use shellfish_ledger::{LedgerDependencies, ShellfishLedgerService};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_harvest_tasks_never_share_an_id() {
        let ledger = Arc::new(TestLedger::new());
        ledger.service.init_counter().unwrap();

        let mut tasks = Vec::new();
        for worker in 0..16u8 {
            let ledger = Arc::clone(&ledger);
            tasks.push(tokio::task::spawn_blocking(move || {
                let caller = identity(worker);
                (0..10)
                    .map(|_| {
                        ledger
                            .service
                            .harvest(&caller, oyster_request())
                            .unwrap()
                            .batch_id
                    })
                    .collect::<Vec<_>>()
            }));
        }

        let mut ids = HashSet::new();
        for task in tasks {
            for id in task.await.unwrap() {
                assert!(ids.insert(id), "batch id {id} handed out twice");
            }
        }
        assert_eq!(ids.len(), 160);
        assert_eq!(ledger.service.fetch_counter().unwrap().count, 160);
    }

    #[test]
    fn test_each_lot_belongs_to_its_harvesting_thread() {
        let ledger = Arc::new(TestLedger::new());
        ledger.service.init_counter().unwrap();

        let handles: Vec<_> = (1..=6u8)
            .map(|seed| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    let me = identity(seed);
                    let mine: Vec<u64> = (0..5)
                        .map(|_| ledger.service.harvest(&me, oyster_request()).unwrap().batch_id)
                        .collect();
                    for id in &mine {
                        ledger.service.process(&me, *id, "graded").unwrap();
                    }
                    (me, mine)
                })
            })
            .collect();

        for handle in handles {
            let (owner, ids) = handle.join().unwrap();
            for id in ids {
                let batch = ledger.service.fetch_batch(id).unwrap();
                assert_eq!(batch.authority, owner);
                assert_eq!(batch.state(), BatchState::Processed);
            }
        }
    }

    #[test]
    fn test_racing_distributes_on_one_lot_commit_once() {
        let ledger = Arc::new(TestLedger::new());
        ledger.service.init_counter().unwrap();
        ledger.service.harvest(&alice(), oyster_request()).unwrap();
        ledger.service.process(&alice(), 0, "packed").unwrap();

        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = (0..6)
                .map(|i| {
                    let ledger = &ledger;
                    s.spawn(move || ledger.service.distribute(&alice(), 0, &format!("route {i}")))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let winner = results.iter().position(Result::is_ok).unwrap();
        assert_eq!(
            ledger.service.fetch_batch(0).unwrap().distribution_details,
            format!("route {winner}")
        );
    }

    #[test]
    fn test_file_store_under_parallel_harvests() {
        let dir = tempdir().unwrap();
        let store = FileBackedKVStore::open(dir.path().join("ledger.db")).unwrap();
        let ledger = Arc::new(ShellfishLedgerService::new(
            LedgerDependencies {
                kv_store: store,
                checksum: Crc32ChecksumProvider,
                time_source: SystemTimeSource,
                serializer: BincodeAccountSerializer,
                events: NoOpEventSink,
            },
            LedgerConfig::default(),
        ));
        ledger.init_counter().unwrap();

        let handles: Vec<_> = (0..4u8)
            .map(|seed| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for _ in 0..10 {
                        ledger.harvest(&identity(seed), oyster_request()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        drop(ledger);

        let reopened = FileBackedKVStore::open(dir.path().join("ledger.db")).unwrap();
        let ledger = ShellfishLedgerService::new(
            LedgerDependencies {
                kv_store: reopened,
                checksum: Crc32ChecksumProvider,
                time_source: SystemTimeSource,
                serializer: BincodeAccountSerializer,
                events: NoOpEventSink,
            },
            LedgerConfig::default(),
        );
        assert_eq!(ledger.fetch_counter().unwrap().count, 40);
        let ids: Vec<u64> = ledger.list_batches().unwrap().iter().map(|b| b.batch_id).collect();
        assert_eq!(ids, (0..40).collect::<Vec<_>>());
    }
}
