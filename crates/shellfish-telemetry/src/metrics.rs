//! Prometheus metrics for the shellfish ledger.
//!
//! All metrics follow the naming convention: `sf_ledger_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., instructions_total)
//! - **Gauge**: Value that can go up or down (e.g., batches by state)
//! - **Histogram**: Distribution of values (e.g., instruction_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

/// Buckets from 100µs to ~3s.
const DURATION_BUCKETS: &[f64] = &[
    0.0001, 0.00025, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 3.0,
];

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INSTRUCTION METRICS
    // =========================================================================

    /// Instructions by kind and outcome
    pub static ref INSTRUCTIONS: CounterVec = CounterVec::new(
        Opts::new("sf_ledger_instructions_total", "Total ledger instructions handled"),
        &["instruction", "outcome"]  // outcome: committed/rejected/failed
    ).expect("metric creation failed");

    /// Instruction handling duration
    pub static ref INSTRUCTION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "sf_ledger_instruction_duration_seconds",
            "Time spent handling a ledger instruction"
        ).buckets(DURATION_BUCKETS.to_vec()),
        &["instruction"]
    ).expect("metric creation failed");

    // =========================================================================
    // LEDGER STATE METRICS
    // =========================================================================

    /// Current sequence counter value
    pub static ref COUNTER_VALUE: Gauge = Gauge::new(
        "sf_ledger_counter_value",
        "Next batch id the sequence counter will assign"
    ).expect("metric creation failed");

    /// Batches by lifecycle state
    pub static ref BATCHES: GaugeVec = GaugeVec::new(
        Opts::new("sf_ledger_batches", "Batch records by lifecycle state"),
        &["state"]  // harvested/processed/distributed
    ).expect("metric creation failed");

    // =========================================================================
    // EVENT METRICS
    // =========================================================================

    /// Events handed to the event sink
    pub static ref EVENTS_PUBLISHED: CounterVec = CounterVec::new(
        Opts::new("sf_ledger_events_published_total", "Total ledger events published"),
        &["event_type"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling it again is a no-op for metrics that are already registered.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(INSTRUCTIONS.clone()),
        Box::new(INSTRUCTION_DURATION.clone()),
        Box::new(COUNTER_VALUE.clone()),
        Box::new(BATCHES.clone()),
        Box::new(EVENTS_PUBLISHED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Count one handled instruction.
pub fn record_instruction(instruction: &str, outcome: &str) {
    INSTRUCTIONS.with_label_values(&[instruction, outcome]).inc();
}

/// Count one published event.
pub fn record_event(event_type: &str) {
    EVENTS_PUBLISHED.with_label_values(&[event_type]).inc();
}

/// Overwrite the ledger state gauges from a fresh scan.
pub fn set_ledger_state(counter: u64, harvested: usize, processed: usize, distributed: usize) {
    COUNTER_VALUE.set(counter as f64);
    BATCHES.with_label_values(&["harvested"]).set(harvested as f64);
    BATCHES.with_label_values(&["processed"]).set(processed as f64);
    BATCHES
        .with_label_values(&["distributed"])
        .set(distributed as f64);
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Macro for timing a code block with a histogram.
///
/// ```ignore
/// let _timer = time_histogram!(INSTRUCTION_DURATION.with_label_values(&["harvest"]));
/// ```
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
