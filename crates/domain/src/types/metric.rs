//! Metric events
//!
//! A [`MetricEvent`] is immutable once recorded. Category-specific metadata is
//! carried by [`MetricPayload`], which is flattened into the event on the wire
//! so a stored event reads as a single JSON object:
//!
//! ```json
//! { "category": "task", "name": "task_completion", "value": 5400.0,
//!   "timestamp": 1704067200000, "url": "app://vitalscope",
//!   "task_id": "onboarding", "success": true }
//! ```

use serde::{Deserialize, Serialize};

use super::vitals::VitalStatus;
use crate::impl_domain_status_conversions;

/// Metric category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    WebVital,
    Ux,
    Task,
    Error,
    Performance,
}

impl_domain_status_conversions!(MetricCategory {
    WebVital => "web_vital",
    Ux => "ux",
    Task => "task",
    Error => "error",
    Performance => "performance",
});

/// Category tag plus the optional fields that category may carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum MetricPayload {
    WebVital {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rating: Option<VitalStatus>,
    },
    Ux {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<String>,
    },
    Task {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        success: Option<bool>,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Performance {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
}

impl MetricPayload {
    /// Payload of the given category with every optional field empty
    pub fn empty(category: MetricCategory) -> Self {
        match category {
            MetricCategory::WebVital => Self::WebVital { rating: None },
            MetricCategory::Ux => Self::Ux { step: None },
            MetricCategory::Task => Self::Task { task_id: None, success: None },
            MetricCategory::Error => Self::Error { message: None },
            MetricCategory::Performance => Self::Performance { unit: None },
        }
    }

    pub fn category(&self) -> MetricCategory {
        match self {
            Self::WebVital { .. } => MetricCategory::WebVital,
            Self::Ux { .. } => MetricCategory::Ux,
            Self::Task { .. } => MetricCategory::Task,
            Self::Error { .. } => MetricCategory::Error,
            Self::Performance { .. } => MetricCategory::Performance,
        }
    }
}

/// A single recorded metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricEvent {
    pub name: String,
    pub value: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub url: String,
    #[serde(flatten)]
    pub payload: MetricPayload,
}

impl MetricEvent {
    pub fn category(&self) -> MetricCategory {
        self.payload.category()
    }

    pub fn is_category(&self, category: MetricCategory) -> bool {
        self.category() == category
    }

    /// `Some(success)` for task events that reported an outcome
    pub fn task_success(&self) -> Option<bool> {
        match &self.payload {
            MetricPayload::Task { success, .. } => *success,
            _ => None,
        }
    }
}
