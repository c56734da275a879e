//! Telemetry sink that writes events to the tracing subscriber

use tracing::{debug, error, info, warn};
use vitalscope_core::{TelemetryEvent, TelemetryLevel, TelemetrySink};

/// Emits each telemetry event as a structured log line
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn capture(&self, event: TelemetryEvent) {
        let tags = format_tags(&event);
        match event.level {
            TelemetryLevel::Debug => debug!(target: "vitalscope::telemetry", tags = %tags, "{}", event.message),
            TelemetryLevel::Info => info!(target: "vitalscope::telemetry", tags = %tags, "{}", event.message),
            TelemetryLevel::Warning => warn!(target: "vitalscope::telemetry", tags = %tags, "{}", event.message),
            TelemetryLevel::Error => error!(target: "vitalscope::telemetry", tags = %tags, "{}", event.message),
        }
    }
}

fn format_tags(event: &TelemetryEvent) -> String {
    event.tags.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join(" ")
}
