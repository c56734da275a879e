//! # VitalScope Domain
//!
//! Business domain types and models for VitalScope.
//!
//! This crate contains:
//! - Metric events and their category payloads
//! - Web Vitals names, thresholds and snapshots
//! - The analysis report and export shapes
//! - Performance entries fed to the observer
//! - Survey results
//! - Domain error types, configuration and constants
//!
//! ## Architecture
//! - No dependencies on other VitalScope crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
