//! Export shape for the raw metric history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metric::MetricEvent;
use super::vitals::WebVitalsSnapshot;

/// Snapshot of everything collected so far
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsExport {
    pub web_vitals: WebVitalsSnapshot,
    pub metrics: Vec<MetricEvent>,
    /// Serialized as RFC 3339
    pub exported_at: DateTime<Utc>,
}
