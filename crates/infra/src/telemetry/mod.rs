//! Telemetry sink adapters

mod http_sink;
mod tracing_sink;

use std::sync::Arc;

pub use http_sink::HttpTelemetrySink;
pub use tracing_sink::TracingTelemetrySink;
use vitalscope_core::TelemetrySink;
use vitalscope_domain::{Result, TelemetryConfig};

/// HTTP sink when telemetry is enabled, otherwise log-only
pub fn build_sink(config: &TelemetryConfig) -> Result<Arc<dyn TelemetrySink>> {
    Ok(match HttpTelemetrySink::from_config(config)? {
        Some(sink) => Arc::new(sink),
        None => Arc::new(TracingTelemetrySink),
    })
}
