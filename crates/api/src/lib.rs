//! # VitalScope Application
//!
//! Application layer - context, commands and the `vitalscope` binary.
//!
//! This crate contains:
//! - Application context (dependency injection and the public operations)
//! - Commands backing each CLI subcommand
//! - Logging initialisation and health reporting
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

pub use commands::{execute, Command};
pub use context::{AppContext, IngestSummary, SurveySummary};
