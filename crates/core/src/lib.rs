//! # VitalScope Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for storage, telemetry and performance entries
//! - The metrics collector, analyzer and Web Vitals observer
//! - The usability survey service
//!
//! ## Architecture Principles
//! - Only depends on `vitalscope-common` and `vitalscope-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod analysis;
pub mod collector;
pub mod observer;
pub mod survey;

// Re-export specific items to avoid ambiguity
pub use analysis::MetricsAnalyzer;
pub use collector::{
    CollectorConfig, KeyValueStore, MetricsCollector, NoopTelemetrySink, TelemetryEvent,
    TelemetryLevel, TelemetrySink, UpdateFn,
};
pub use observer::{ObserverHandle, PerformanceEntrySource, WebVitalsObserver};
pub use survey::{sus_score, SurveyService};
