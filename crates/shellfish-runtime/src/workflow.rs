//! # Ledger Workflow
//!
//! Runs ledger operations on behalf of one caller, timing each instruction
//! and counting its outcome in the metrics registry.
//!
//! The demo walks one lot through its whole lifecycle:
//!
//! ```text
//! init counter (or reuse) → harvest → process → distribute → final counter
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use shellfish_ledger::{
    BatchId, BatchRecord, BatchState, CommitId, HarvestReceipt, HarvestRequest, Identity,
    Instruction, InstructionKind, LedgerError, Outcome, ShellfishLedgerApi,
};
use shellfish_telemetry::{
    log_batch_event, record_instruction, set_ledger_state, time_histogram, INSTRUCTION_DURATION,
};
use std::fmt;
use tracing::info;

/// Metrics label for an instruction result.
pub fn outcome_label<T>(result: &Result<T, LedgerError>) -> &'static str {
    match result {
        Ok(_) => "committed",
        Err(e) if e.is_precondition() => "rejected",
        Err(_) => "failed",
    }
}

/// Result of making sure the counter exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterSetup {
    Created(CommitId),
    AlreadyInitialized,
}

/// Everything the demo observed, in order.
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub caller: Identity,
    pub setup: CounterSetup,
    pub counter_before: u64,
    pub receipt: HarvestReceipt,
    pub harvested: BatchRecord,
    pub process_commit: CommitId,
    pub processed: BatchRecord,
    pub distribute_commit: CommitId,
    pub distributed: BatchRecord,
    pub counter_after: u64,
}

/// Ledger operations for a single caller.
pub struct Workflow<'a, L: ShellfishLedgerApi + ?Sized> {
    ledger: &'a L,
    caller: Identity,
}

impl<'a, L: ShellfishLedgerApi + ?Sized> Workflow<'a, L> {
    pub fn new(ledger: &'a L, caller: Identity) -> Self {
        Self { ledger, caller }
    }

    pub fn caller(&self) -> &Identity {
        &self.caller
    }

    fn observe<T>(
        &self,
        kind: InstructionKind,
        op: impl FnOnce() -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let _timer = time_histogram!(INSTRUCTION_DURATION.with_label_values(&[kind.as_str()]));
        let result = op();
        record_instruction(kind.as_str(), outcome_label(&result));
        result
    }

    /// Create the counter, treating an existing one as success.
    pub fn ensure_counter(&self) -> Result<CounterSetup, LedgerError> {
        match self.observe(InstructionKind::InitCounter, || self.ledger.init_counter()) {
            Ok(commit_id) => Ok(CounterSetup::Created(commit_id)),
            Err(LedgerError::AlreadyInitialized { .. }) => Ok(CounterSetup::AlreadyInitialized),
            Err(e) => Err(e),
        }
    }

    pub fn harvest(&self, request: HarvestRequest) -> Result<HarvestReceipt, LedgerError> {
        self.observe(InstructionKind::Harvest, || {
            self.ledger.harvest(&self.caller, request)
        })
    }

    pub fn process(&self, batch_id: BatchId, details: &str) -> Result<CommitId, LedgerError> {
        self.observe(InstructionKind::Process, || {
            self.ledger.process(&self.caller, batch_id, details)
        })
    }

    pub fn distribute(&self, batch_id: BatchId, details: &str) -> Result<CommitId, LedgerError> {
        self.observe(InstructionKind::Distribute, || {
            self.ledger.distribute(&self.caller, batch_id, details)
        })
    }

    /// Submit a raw instruction through the dispatcher.
    pub fn submit(&self, instruction: Instruction) -> Result<Outcome, LedgerError> {
        self.observe(instruction.kind(), || {
            self.ledger.dispatch(&self.caller, instruction)
        })
    }

    /// Recompute the counter and per-state gauges from storage.
    pub fn refresh_gauges(&self) -> Result<(), LedgerError> {
        let counter = match self.ledger.fetch_counter() {
            Ok(counter) => counter.count,
            Err(LedgerError::NotFound { .. }) => 0,
            Err(e) => return Err(e),
        };

        let (mut harvested, mut processed, mut distributed) = (0, 0, 0);
        for batch in self.ledger.list_batches()? {
            match batch.state() {
                BatchState::Harvested => harvested += 1,
                BatchState::Processed => processed += 1,
                BatchState::Distributed => distributed += 1,
            }
        }
        set_ledger_state(counter, harvested, processed, distributed);
        Ok(())
    }

    /// Walk one lot from harvest to distribution.
    pub fn run_demo(
        &self,
        request: HarvestRequest,
        now: DateTime<Utc>,
    ) -> Result<DemoReport, LedgerError> {
        let setup = self.ensure_counter()?;
        let counter_before = self.ledger.fetch_counter()?.count;

        let receipt = self.harvest(request)?;
        let harvested = self.ledger.fetch_batch(receipt.batch_id)?;
        log_batch_event!(
            info,
            "Demo lot harvested",
            harvested.batch_id,
            species = %harvested.species
        );

        let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let process_commit = self.process(
            receipt.batch_id,
            &format!("Cleaned and packaged at Facility XYZ on {stamp}"),
        )?;
        let processed = self.ledger.fetch_batch(receipt.batch_id)?;
        log_batch_event!(
            info,
            "Demo lot processed",
            processed.batch_id,
            state = %processed.state()
        );

        let distribute_commit = self.distribute(
            receipt.batch_id,
            &format!("Shipped to Restaurant Group Inc. via TruckCo on {stamp}"),
        )?;
        let distributed = self.ledger.fetch_batch(receipt.batch_id)?;
        log_batch_event!(
            info,
            "Demo lot distributed",
            distributed.batch_id,
            state = %distributed.state()
        );

        let counter_after = self.ledger.fetch_counter()?.count;
        info!(
            batch_id = receipt.batch_id,
            counter_after, "Supply chain workflow finished"
        );

        Ok(DemoReport {
            caller: self.caller,
            setup,
            counter_before,
            receipt,
            harvested,
            process_commit,
            processed,
            distribute_commit,
            distributed,
            counter_after,
        })
    }
}

/// Seconds since the epoch as an RFC 3339 string, or the raw number if out
/// of range.
pub fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| secs.to_string())
}

/// Multi-line description of a batch.
pub fn format_batch(batch: &BatchRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("- Batch ID: {}\n", batch.batch_id));
    out.push_str(&format!("- Species: {}\n", batch.species));
    out.push_str(&format!("- Harvester: {}\n", batch.harvester));
    out.push_str(&format!("- Location: {}\n", batch.harvest_location));
    out.push_str(&format!(
        "- Harvest Time: {}\n",
        format_timestamp(batch.harvest_time)
    ));
    out.push_str(&format!("- State: {}\n", batch.state()));
    out.push_str(&format!("- Is Processed: {}\n", batch.is_processed));
    if batch.is_processed {
        out.push_str(&format!(
            "- Processing Details: {}\n",
            batch.processing_details
        ));
    }
    out.push_str(&format!("- Is Distributed: {}\n", batch.is_distributed));
    if batch.is_distributed {
        out.push_str(&format!(
            "- Distribution Details: {}\n",
            batch.distribution_details
        ));
    }
    out.push_str(&format!("- Authority: {}", batch.authority));
    out
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wallet: {}", self.caller)?;

        writeln!(f, "\n--- Initializing counter ---")?;
        match self.setup {
            CounterSetup::Created(commit_id) => {
                writeln!(f, "Counter initialized (commit {commit_id})")?
            }
            CounterSetup::AlreadyInitialized => {
                writeln!(f, "Counter already initialized, continuing...")?
            }
        }
        writeln!(f, "Current counter value: {}", self.counter_before)?;

        writeln!(f, "\n--- Harvesting shellfish ---")?;
        writeln!(f, "Batch account: {}", self.receipt.address)?;
        writeln!(f, "Harvest commit: {}", self.receipt.commit_id)?;
        writeln!(f, "\nBatch Details:\n{}", format_batch(&self.harvested))?;

        writeln!(f, "\n--- Processing shellfish ---")?;
        writeln!(f, "Process commit: {}", self.process_commit)?;
        writeln!(
            f,
            "- Processing Details: {}",
            self.processed.processing_details
        )?;
        writeln!(f, "- Is Processed: {}", self.processed.is_processed)?;

        writeln!(f, "\n--- Distributing shellfish ---")?;
        writeln!(f, "Distribution commit: {}", self.distribute_commit)?;
        writeln!(
            f,
            "- Distribution Details: {}",
            self.distributed.distribution_details
        )?;
        writeln!(f, "- Is Distributed: {}", self.distributed.is_distributed)?;

        writeln!(f, "\n--- Final State ---")?;
        write!(f, "Counter value: {}", self.counter_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shellfish_ledger::test_utils::{alice, bob, oyster_request, TestLedger};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_demo_walks_full_lifecycle() {
        let test = TestLedger::new();
        let workflow = Workflow::new(&test.service, alice());

        let report = workflow.run_demo(oyster_request(), fixed_now()).unwrap();

        assert!(matches!(report.setup, CounterSetup::Created(_)));
        assert_eq!(report.counter_before, 0);
        assert_eq!(report.receipt.batch_id, 0);
        assert_eq!(report.harvested.state(), BatchState::Harvested);
        assert_eq!(report.processed.state(), BatchState::Processed);
        assert_eq!(report.distributed.state(), BatchState::Distributed);
        assert_eq!(
            report.distributed.processing_details,
            "Cleaned and packaged at Facility XYZ on 2024-03-01T09:30:00.000Z"
        );
        assert_eq!(
            report.distributed.distribution_details,
            "Shipped to Restaurant Group Inc. via TruckCo on 2024-03-01T09:30:00.000Z"
        );
        assert_eq!(report.counter_after, 1);
    }

    #[test]
    fn test_workflow_times_each_instruction() {
        let test = TestLedger::new();
        let workflow = Workflow::new(&test.service, alice());
        workflow.ensure_counter().unwrap();

        let histogram = INSTRUCTION_DURATION.with_label_values(&["harvest"]);
        let before = histogram.get_sample_count();
        workflow.harvest(oyster_request()).unwrap();
        assert!(histogram.get_sample_count() > before);
    }

    #[test]
    fn test_demo_rerun_reuses_counter() {
        let test = TestLedger::new();
        let workflow = Workflow::new(&test.service, alice());
        workflow.run_demo(oyster_request(), fixed_now()).unwrap();

        let second = workflow.run_demo(oyster_request(), fixed_now()).unwrap();
        assert_eq!(second.setup, CounterSetup::AlreadyInitialized);
        assert_eq!(second.counter_before, 1);
        assert_eq!(second.receipt.batch_id, 1);
        assert_eq!(second.counter_after, 2);

        let text = second.to_string();
        assert!(text.contains("Counter already initialized, continuing..."));
        assert!(text.contains("Counter value: 2"));
    }

    #[test]
    fn test_outcome_labels() {
        let test = TestLedger::new();
        let owner = Workflow::new(&test.service, alice());
        let intruder = Workflow::new(&test.service, bob());

        owner.ensure_counter().unwrap();
        let receipt = owner.harvest(oyster_request()).unwrap();

        let committed = owner.process(receipt.batch_id, "washed");
        assert_eq!(outcome_label(&committed), "committed");

        let rejected = intruder.distribute(receipt.batch_id, "stolen");
        assert_eq!(outcome_label(&rejected), "rejected");
    }

    #[test]
    fn test_submit_routes_through_dispatcher() {
        let test = TestLedger::new();
        let workflow = Workflow::new(&test.service, alice());

        workflow.submit(Instruction::InitCounter).unwrap();
        let outcome = workflow
            .submit(Instruction::harvest(oyster_request()))
            .unwrap();
        assert_eq!(outcome.batch_id(), Some(0));
    }

    #[test]
    fn test_refresh_gauges_before_init() {
        let test = TestLedger::new();
        let workflow = Workflow::new(&test.service, alice());
        assert!(workflow.refresh_gauges().is_ok());
    }

    #[test]
    fn test_format_batch_shows_details_once_set() {
        let test = TestLedger::new();
        let workflow = Workflow::new(&test.service, alice());
        workflow.ensure_counter().unwrap();
        let receipt = workflow.harvest(oyster_request()).unwrap();

        let fresh = format_batch(&test.service.fetch_batch(receipt.batch_id).unwrap());
        assert!(fresh.contains("- Species: Oyster"));
        assert!(fresh.contains("- Harvest Time: 2023-11-14T22:13:20.000Z"));
        assert!(!fresh.contains("Processing Details"));

        workflow.process(receipt.batch_id, "Shucked").unwrap();
        let processed = format_batch(&test.service.fetch_batch(receipt.batch_id).unwrap());
        assert!(processed.contains("- Processing Details: Shucked"));
    }
}
