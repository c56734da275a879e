//! Analysis report
//!
//! The report is derived data: it is rebuilt from the full metric history on
//! every request and never persisted, except when a caller keeps one around
//! as the baseline for a later regression comparison. Every struct therefore
//! tolerates missing fields on deserialization so a partial or older
//! baseline still loads.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metric::MetricCategory;
use super::vitals::{VitalName, VitalStatus};
use crate::impl_domain_status_conversions;

/// Status label shared by every report section
///
/// `NotAvailable` (`"N/A"`) marks a section with no samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Excellent,
    Good,
    NeedsImprovement,
    Poor,
    #[default]
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::NeedsImprovement => "needs_improvement",
            Self::Poor => "poor",
            Self::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<VitalStatus> for ReportStatus {
    fn from(status: VitalStatus) -> Self {
        match status {
            VitalStatus::Good => Self::Good,
            VitalStatus::NeedsImprovement => Self::NeedsImprovement,
            VitalStatus::Poor => Self::Poor,
        }
    }
}

/// Full analysis of a metric history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub web_vitals: BTreeMap<VitalName, VitalStats>,
    pub ux_metrics: UxMetrics,
    pub task_performance: TaskPerformance,
    pub errors: ErrorSummary,
    pub trends: TrendReport,
    pub regression: Option<RegressionReport>,
    pub recommendations: Vec<Recommendation>,
    /// Sample statistics per `performance` metric name
    pub performance: BTreeMap<String, PerformanceStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSummary {
    pub total_metrics: usize,
    /// Distinct categories present, sorted
    pub categories: Vec<MetricCategory>,
    pub time_range: Option<TimeRange>,
}

/// Inclusive range of event timestamps (epoch ms)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalStats {
    pub count: usize,
    /// Most recent sample
    pub current: Option<f64>,
    pub average: Option<f64>,
    pub median: Option<f64>,
    pub p90: Option<f64>,
    pub p95: Option<f64>,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UxMetrics {
    pub ttv: TtvStats,
}

/// Time-to-value statistics (ms)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtvStats {
    pub count: usize,
    pub average: Option<f64>,
    pub median: Option<f64>,
    pub p90: Option<f64>,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPerformance {
    pub total: usize,
    pub successful: usize,
    /// Percentage rounded to two decimals, 0 when there are no tasks
    pub success_rate: f64,
    pub average_duration: Option<f64>,
    pub median_duration: Option<f64>,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorSummary {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    /// Errors as a percentage of all metrics, formatted with two decimals
    pub error_rate: String,
}

impl ErrorSummary {
    /// Numeric form of `error_rate`, 0 if it does not parse
    pub fn error_rate_percent(&self) -> f64 {
        self.error_rate.parse().unwrap_or(0.0)
    }
}

impl Default for ErrorSummary {
    fn default() -> Self {
        Self { total: 0, by_type: BTreeMap::new(), error_rate: "0.00".to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl_domain_status_conversions!(Trend {
    Increasing => "increasing",
    Decreasing => "decreasing",
    Stable => "stable",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendReport {
    /// Event count per UTC day (`YYYY-MM-DD`)
    pub daily_counts: BTreeMap<String, usize>,
    /// Only set when at least two distinct days exist
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionReport {
    pub web_vitals: BTreeMap<VitalName, VitalRegression>,
    pub task_success_rate: Option<SuccessRateRegression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalRegression {
    pub baseline: f64,
    pub current: f64,
    pub change_percent: f64,
    /// Lower is better for every vital
    pub improved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessRateRegression {
    pub baseline: f64,
    pub current: f64,
    /// Difference in percentage points
    pub change: f64,
    pub improved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl_domain_status_conversions!(Priority {
    High => "high",
    Medium => "medium",
    Low => "low",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: MetricCategory,
    pub priority: Priority,
    pub metric: String,
    pub issue: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub count: usize,
    pub average: f64,
    pub median: f64,
    pub p95: f64,
}
