//! Tracing setup and structured logging helpers
//!
//! Log output always goes to stderr so the CLI can keep stdout for JSON.

use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;
use vitalscope_domain::VitalScopeError;

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// `VITALSCOPE_LOG_FORMAT=json` selects JSON, anything else is pretty
    pub fn from_env() -> Self {
        match std::env::var("VITALSCOPE_LOG_FORMAT") {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Install the global subscriber
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Fails if a
/// subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` should be a stable identifier such as `"metrics::report"`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `VitalScopeError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &VitalScopeError) -> &'static str {
    match error {
        VitalScopeError::Storage(_) => "storage",
        VitalScopeError::Config(_) => "config",
        VitalScopeError::Serialization(_) => "serialization",
        VitalScopeError::Observation(_) => "observation",
        VitalScopeError::Telemetry(_) => "telemetry",
        VitalScopeError::InvalidInput(_) => "invalid_input",
        VitalScopeError::NotFound(_) => "not_found",
        VitalScopeError::Internal(_) => "internal",
    }
}
