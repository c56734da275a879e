//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Storage keys
pub const METRICS_STORAGE_KEY: &str = "metrics_data";
pub const SUS_STORAGE_KEY: &str = "sus_results";
pub const NPS_STORAGE_KEY: &str = "nps_results";

// Persisted metrics are trimmed to the most recent entries on every save
pub const MAX_STORED_METRICS: usize = 1000;

// Collection defaults
pub const DEFAULT_PAGE_URL: &str = "app://vitalscope";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

// Well-known metric names
pub const TASK_COMPLETION_METRIC: &str = "task_completion";
pub const TIME_TO_VALUE_METRIC: &str = "TTV";

// Web Vitals thresholds (good <=, needs improvement <=, else poor)
pub const LCP_GOOD_MS: f64 = 2500.0;
pub const LCP_POOR_MS: f64 = 4000.0;
pub const FCP_GOOD_MS: f64 = 1800.0;
pub const FCP_POOR_MS: f64 = 3000.0;
pub const CLS_GOOD: f64 = 0.1;
pub const CLS_POOR: f64 = 0.25;
pub const INP_GOOD_MS: f64 = 200.0;
pub const INP_POOR_MS: f64 = 500.0;
pub const TTFB_GOOD_MS: f64 = 800.0;
pub const TTFB_POOR_MS: f64 = 1800.0;

// UX and task thresholds
pub const TTV_GOOD_THRESHOLD_MS: f64 = 600_000.0; // 10 minutes
pub const TASK_SUCCESS_EXCELLENT: f64 = 90.0;
pub const TASK_SUCCESS_GOOD: f64 = 75.0;
pub const ERROR_RATE_ALERT_PERCENT: f64 = 5.0;

// Surveys
pub const SUS_QUESTION_COUNT: usize = 10;
pub const SUS_SCORE_MULTIPLIER: f64 = 2.5;
pub const SUS_EXCELLENT: f64 = 80.3;
pub const SUS_GOOD: f64 = 68.0;
pub const SUS_OKAY: f64 = 51.0;
pub const NPS_MAX_SCORE: u8 = 10;

// Telemetry
pub const DEFAULT_TELEMETRY_TIMEOUT_MS: u64 = 2000;
