//! HTTP telemetry sink
//!
//! Each event is POSTed as JSON from a background task. Delivery failures are
//! logged and never reach the caller. The tasks are tracked so
//! [`TelemetrySink::flush`] can wait for them before the runtime goes away.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use vitalscope_core::{TelemetryEvent, TelemetrySink};
use vitalscope_domain::{Result, TelemetryConfig, VitalScopeError};

use crate::errors::InfraError;

#[derive(Debug, Clone)]
pub struct HttpTelemetrySink {
    client: Client,
    endpoint: String,
    in_flight: Arc<Mutex<JoinSet<()>>>,
}

impl HttpTelemetrySink {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VitalScopeError::from(InfraError::from(e)))?;

        Ok(Self { client, endpoint: endpoint.into(), in_flight: Arc::default() })
    }

    /// Build from configuration; `None` when telemetry is disabled
    pub fn from_config(config: &TelemetryConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }

        let endpoint = config.endpoint.as_deref().filter(|e| !e.trim().is_empty()).ok_or_else(
            || VitalScopeError::Config("telemetry is enabled but no endpoint is set".to_string()),
        )?;

        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(VitalScopeError::Config(format!(
                "telemetry endpoint must be an http(s) URL: {endpoint}"
            )));
        }

        Self::new(endpoint, Duration::from_millis(config.timeout_ms)).map(Some)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Deliveries spawned and not yet reaped
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// POST one event and wait for the response
    pub async fn send(&self, event: &TelemetryEvent) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .json(event)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| VitalScopeError::from(InfraError::from(e)))?;
        Ok(())
    }
}

#[async_trait]
impl TelemetrySink for HttpTelemetrySink {
    fn capture(&self, event: TelemetryEvent) {
        let Ok(handle) = Handle::try_current() else {
            warn!(message = %event.message, "no async runtime, telemetry event dropped");
            return;
        };

        let sink = self.clone();
        let mut in_flight = self.in_flight.lock();
        while in_flight.try_join_next().is_some() {}
        in_flight.spawn_on(
            async move {
                match sink.send(&event).await {
                    Ok(()) => debug!(message = %event.message, "telemetry event delivered"),
                    Err(err) => {
                        warn!(message = %event.message, error = %err, "telemetry delivery failed");
                    }
                }
            },
            &handle,
        );
    }

    async fn flush(&self, timeout: Duration) {
        let mut pending = std::mem::take(&mut *self.in_flight.lock());
        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        let drained =
            tokio::time::timeout(timeout, async { while pending.join_next().await.is_some() {} })
                .await;
        match drained {
            Ok(()) => debug!(events = count, "telemetry flushed"),
            Err(_) => warn!(abandoned = pending.len(), "telemetry flush timed out"),
        }
    }
}
