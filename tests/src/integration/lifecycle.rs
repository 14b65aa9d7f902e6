//! # Lot Lifecycle
//!
//! A lot moves `Harvested → Processed → Distributed`, driven only by the
//! identity that harvested it, and each rejected step leaves storage as it
//! was.

#[cfg(test)]
mod tests {
    use shellfish_ledger::prelude::*;
    use shellfish_ledger::test_utils::{alice, bob, clam_request, oyster_request, TestLedger};
    use shellfish_ledger::{AccountRef, InstructionKind};

    fn ready() -> TestLedger {
        let ledger = TestLedger::new();
        ledger.service.init_counter().unwrap();
        ledger
    }

    #[test]
    fn test_oyster_then_clam_scenario() {
        let ledger = ready();
        let svc = &ledger.service;

        let oyster = svc.harvest(&alice(), oyster_request()).unwrap();
        assert_eq!(oyster.batch_id, 0);
        let fresh = svc.fetch_batch(0).unwrap();
        assert!(!fresh.is_processed && !fresh.is_distributed);
        assert_eq!(svc.fetch_counter().unwrap().count, 1);

        svc.process(&alice(), 0, "Cleaned and packaged").unwrap();
        assert_eq!(svc.fetch_batch(0).unwrap().state(), BatchState::Processed);

        svc.distribute(&alice(), 0, "Shipped to buyer").unwrap();
        let oyster_final = svc.fetch_batch(0).unwrap();
        assert_eq!(oyster_final.state(), BatchState::Distributed);
        assert_eq!(oyster_final.processing_details, "Cleaned and packaged");
        assert_eq!(oyster_final.distribution_details, "Shipped to buyer");

        let clam = svc.harvest(&bob(), clam_request()).unwrap();
        assert_eq!(clam.batch_id, 1);
        assert_eq!(svc.fetch_counter().unwrap().count, 2);
        assert_eq!(svc.fetch_batch(0).unwrap(), oyster_final);
        assert_eq!(svc.fetch_batch(1).unwrap().authority, bob());
    }

    #[test]
    fn test_each_rejection_keeps_prior_state() {
        let ledger = ready();
        let svc = &ledger.service;
        svc.harvest(&alice(), oyster_request()).unwrap();

        let before = svc.fetch_batch(0).unwrap();
        assert!(matches!(
            svc.distribute(&alice(), 0, "too early"),
            Err(LedgerError::NotProcessedYet { batch_id: 0 })
        ));
        assert!(matches!(
            svc.process(&bob(), 0, "not mine"),
            Err(LedgerError::Unauthorized { batch_id: 0, .. })
        ));
        assert_eq!(svc.fetch_batch(0).unwrap(), before);

        svc.process(&alice(), 0, "first").unwrap();
        assert!(matches!(
            svc.process(&alice(), 0, "second"),
            Err(LedgerError::AlreadyProcessed { batch_id: 0 })
        ));
        assert_eq!(svc.fetch_batch(0).unwrap().processing_details, "first");

        svc.distribute(&alice(), 0, "truck").unwrap();
        assert!(matches!(
            svc.distribute(&alice(), 0, "boat"),
            Err(LedgerError::AlreadyDistributed { batch_id: 0 })
        ));
        assert_eq!(svc.fetch_batch(0).unwrap().distribution_details, "truck");
    }

    #[test]
    fn test_error_codes_distinguish_every_rejection() {
        let ledger = TestLedger::new();
        let svc = &ledger.service;

        let not_found = svc.harvest(&alice(), oyster_request()).unwrap_err();
        assert_eq!(
            not_found,
            LedgerError::NotFound {
                account: AccountRef::Counter
            }
        );

        svc.init_counter().unwrap();
        let errors = [
            not_found,
            svc.init_counter().unwrap_err(),
            svc.harvest(&alice(), HarvestRequest::new("", "x", "y"))
                .unwrap_err(),
        ];
        let mut codes: Vec<u32> = errors.iter().map(LedgerError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(errors.iter().all(LedgerError::is_precondition));
    }

    #[test]
    fn test_json_instructions_drive_the_dispatcher() {
        let ledger = TestLedger::new();
        let svc = &ledger.service;

        let script = [
            r#"{"instruction":"init_counter"}"#,
            r#"{"instruction":"harvest","species":"Mussel","harvester":"Ana Ruiz","harvest_location":"Galicia"}"#,
            r#"{"instruction":"process","batch_id":0,"processing_details":"Depurated 48h"}"#,
            r#"{"instruction":"distribute","batch_id":0,"distribution_details":"Lonja de Vigo"}"#,
        ];

        let kinds: Vec<InstructionKind> = script
            .iter()
            .map(|json| {
                let instruction: Instruction = serde_json::from_str(json).unwrap();
                let kind = instruction.kind();
                svc.dispatch(&alice(), instruction).unwrap();
                kind
            })
            .collect();

        assert_eq!(kinds, InstructionKind::ALL.to_vec());
        let batch = svc.fetch_batch(0).unwrap();
        assert_eq!(batch.species, "Mussel");
        assert_eq!(batch.state(), BatchState::Distributed);
        assert_eq!(svc.stats().total_committed(), 4);
    }

    #[test]
    fn test_list_batches_reports_mixed_states() {
        let ledger = ready();
        let svc = &ledger.service;
        for _ in 0..3 {
            svc.harvest(&alice(), oyster_request()).unwrap();
        }
        svc.process(&alice(), 1, "washed").unwrap();
        svc.process(&alice(), 2, "washed").unwrap();
        svc.distribute(&alice(), 2, "sold").unwrap();

        let states: Vec<BatchState> = svc
            .list_batches()
            .unwrap()
            .iter()
            .map(BatchRecord::state)
            .collect();
        assert_eq!(
            states,
            vec![
                BatchState::Harvested,
                BatchState::Processed,
                BatchState::Distributed
            ]
        );
    }
}
