//! # Shellfish Runtime
//!
//! Command-line entry point for the shellfish ledger.
//!
//! ```text
//! shellfish-runtime demo
//! shellfish-runtime harvest --species Oyster --harvester "John Doe" --location "Gulf Coast"
//! shellfish-runtime process 0 "Cleaned and packaged"
//! shellfish-runtime batches --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use shellfish_ledger::{HarvestRequest, Instruction, ShellfishLedgerApi};
use shellfish_runtime::workflow::format_batch;
use shellfish_runtime::{
    load_or_create_identity, CounterSetup, LedgerContainer, RuntimeConfig, StorageBackend,
    Workflow,
};
use shellfish_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};

#[derive(Parser)]
#[command(name = "shellfish-runtime")]
#[command(about = "Shellfish harvest lot ledger")]
struct Cli {
    /// Data directory
    #[arg(short, long, env = "SF_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Storage backend (file, memory, rocksdb)
    #[arg(short, long)]
    backend: Option<StorageBackend>,

    /// Wallet file holding the caller identity
    #[arg(short, long)]
    wallet: Option<PathBuf>,

    /// Print Prometheus metrics after the command
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full harvest → process → distribute flow for one lot
    Demo {
        #[arg(long, default_value = "Oyster")]
        species: String,
        #[arg(long, default_value = "John Doe")]
        harvester: String,
        #[arg(long, default_value = "Gulf Coast")]
        location: String,
    },

    /// Create the batch counter
    Init,

    /// Record a new harvest lot
    Harvest {
        #[arg(long)]
        species: String,
        #[arg(long)]
        harvester: String,
        #[arg(long)]
        location: String,
    },

    /// Mark a lot as processed
    Process {
        batch_id: u64,
        details: String,
    },

    /// Mark a processed lot as distributed
    Distribute {
        batch_id: u64,
        details: String,
    },

    /// Submit a JSON-encoded instruction, e.g. '{"instruction":"init_counter"}'
    Submit { instruction: String },

    /// Show one lot
    Batch {
        batch_id: u64,
        #[arg(long)]
        json: bool,
    },

    /// List every lot in id order
    Batches {
        #[arg(long)]
        json: bool,
    },

    /// Show the counter value
    Counter,
}

/// Apply CLI overrides on top of the environment.
fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_env().context("failed to read configuration")?;

    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(wallet) = &cli.wallet {
        config.wallet_path = Some(wallet.clone());
    }
    Ok(config)
}

fn run_command(container: &LedgerContainer, command: Command) -> Result<()> {
    let ledger = container.ledger();
    let identity = load_or_create_identity(&container.config().wallet_file())?;
    let workflow = Workflow::new(ledger.as_ref(), identity);

    match command {
        Command::Demo {
            species,
            harvester,
            location,
        } => {
            let report = workflow
                .run_demo(HarvestRequest::new(species, harvester, location), Utc::now())
                .context("supply chain workflow failed")?;
            println!("{report}");
            println!("\nComplete supply chain tracking workflow finished successfully!");
        }
        Command::Init => match workflow.ensure_counter()? {
            CounterSetup::Created(commit_id) => println!("Counter initialized (commit {commit_id})"),
            CounterSetup::AlreadyInitialized => println!("Counter already initialized"),
        },
        Command::Harvest {
            species,
            harvester,
            location,
        } => {
            let receipt = workflow.harvest(HarvestRequest::new(species, harvester, location))?;
            println!("Harvested batch {} at {}", receipt.batch_id, receipt.address);
            println!("Commit: {}", receipt.commit_id);
        }
        Command::Process { batch_id, details } => {
            let commit_id = workflow.process(batch_id, &details)?;
            println!("Processed batch {batch_id} (commit {commit_id})");
        }
        Command::Distribute { batch_id, details } => {
            let commit_id = workflow.distribute(batch_id, &details)?;
            println!("Distributed batch {batch_id} (commit {commit_id})");
        }
        Command::Submit { instruction } => {
            let instruction: Instruction =
                serde_json::from_str(&instruction).context("malformed instruction JSON")?;
            let outcome = workflow.submit(instruction)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Batch { batch_id, json } => {
            let batch = ledger.fetch_batch(batch_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                println!("{}", format_batch(&batch));
            }
        }
        Command::Batches { json } => {
            let batches = ledger.list_batches()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&batches)?);
            } else if batches.is_empty() {
                println!("No batches recorded");
            } else {
                for batch in &batches {
                    println!("{}\n", format_batch(batch));
                }
            }
        }
        Command::Counter => {
            println!("Counter value: {}", ledger.fetch_counter()?.count);
        }
    }

    workflow.refresh_gauges()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _telemetry = init_telemetry(TelemetryConfig::from_env())?;

    let config = load_config(&cli)?;
    info!(
        backend = %config.backend,
        data_dir = %config.data_dir.display(),
        "Starting shellfish runtime"
    );

    let container = LedgerContainer::build(config)?;
    let monitor = container.spawn_event_monitor();

    let result = run_command(&container, cli.command);
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }

    // Dropping the container closes the event channel and stops the monitor.
    drop(container);
    let events = monitor.await.context("event monitor panicked")?;
    info!(events, "Shutdown complete");

    if cli.metrics {
        println!("\n{}", encode_metrics()?);
    }
    result
}
