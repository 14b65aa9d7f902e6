//! Structured logging.
//!
//! Builds the global `tracing` subscriber: an `EnvFilter` plus either a JSON
//! or a human-readable formatter. JSON lines carry `timestamp`, `level`,
//! `target`, the message and every structured field (`batch_id`,
//! `commit_id`, `instruction`, ...).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Install the global subscriber.
///
/// Fails if the filter directive is invalid or a subscriber is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("log level '{}': {}", config.log_level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match (config.console_output, config.json_logs) {
        (false, _) => registry.try_init(),
        (true, true) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        (true, false) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .try_init(),
    };
    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Structured logging initialized"
    );
    Ok(())
}

/// Log a ledger event with the service tag and standard fields.
///
/// ```ignore
/// log_batch_event!(info, "Batch fetched", batch_id, state = %batch.state());
/// ```
#[macro_export]
macro_rules! log_batch_event {
    ($level:ident, $msg:expr, $batch_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = "shellfish-ledger",
            batch_id = $batch_id,
            $($($field)*,)?
            $msg
        )
    };
}
