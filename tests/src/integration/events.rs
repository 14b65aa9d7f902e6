//! # Event Fan-out and Metrics
//!
//! Subscribers of the runtime's broadcast sink see one event per commit, in
//! commit order, and the workflow feeds the Prometheus registry.

#[cfg(test)]
mod tests {
    use shellfish_ledger::prelude::*;
    use shellfish_ledger::test_utils::{alice, bob, oyster_request};
    use shellfish_ledger::LedgerEvent;
    use shellfish_runtime::{LedgerContainer, RuntimeConfig, StorageBackend, Workflow};
    use shellfish_telemetry::{encode_metrics, register_metrics, INSTRUCTIONS};

    fn memory_container() -> LedgerContainer {
        LedgerContainer::build(RuntimeConfig {
            backend: StorageBackend::Memory,
            ..RuntimeConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_subscriber_sees_commits_in_order() {
        let container = memory_container();
        let mut rx = container.events().subscribe();
        let ledger = container.ledger();

        ledger.init_counter().unwrap();
        let receipt = ledger.harvest(&alice(), oyster_request()).unwrap();
        let _ = ledger.process(&bob(), 0, "rejected, no event");
        let process_commit = ledger.process(&alice(), 0, "washed").unwrap();
        ledger.distribute(&alice(), 0, "sold").unwrap();

        let mut received = Vec::new();
        for _ in 0..4 {
            received.push(rx.recv().await.unwrap());
        }
        assert!(rx.try_recv().is_err());

        let types: Vec<&str> = received.iter().map(LedgerEvent::event_type).collect();
        assert_eq!(
            types,
            vec![
                "counter_initialized",
                "batch_harvested",
                "batch_processed",
                "batch_distributed"
            ]
        );

        match &received[1] {
            LedgerEvent::BatchHarvested {
                commit_id,
                batch_id,
                species,
                counter,
                ..
            } => {
                assert_eq!(*commit_id, receipt.commit_id);
                assert_eq!(*batch_id, 0);
                assert_eq!(species, "Oyster");
                assert_eq!(*counter, 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(received[2].commit_id(), process_commit);
    }

    #[tokio::test]
    async fn test_monitor_drains_before_shutdown() {
        let container = memory_container();
        let monitor = container.spawn_event_monitor();
        {
            let ledger = container.ledger();
            let workflow = Workflow::new(ledger.as_ref(), alice());
            workflow
                .run_demo(oyster_request(), chrono::Utc::now())
                .unwrap();
        }
        drop(container);
        assert_eq!(monitor.await.unwrap(), 4);
    }

    #[test]
    fn test_workflow_outcomes_reach_prometheus() {
        register_metrics().unwrap();
        let container = memory_container();
        let ledger = container.ledger();
        let owner = Workflow::new(ledger.as_ref(), alice());
        let stranger = Workflow::new(ledger.as_ref(), bob());

        let rejected = INSTRUCTIONS.with_label_values(&["process", "rejected"]);
        let before = rejected.get();

        owner.ensure_counter().unwrap();
        owner.harvest(oyster_request()).unwrap();
        assert!(stranger.process(0, "not yours").is_err());
        owner.refresh_gauges().unwrap();

        assert_eq!(rejected.get(), before + 1.0);
        let text = encode_metrics().unwrap();
        assert!(text.contains("sf_ledger_instruction_duration_seconds"));
        assert!(text.contains("sf_ledger_batches"));
    }
}
