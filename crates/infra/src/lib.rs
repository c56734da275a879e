//! # VitalScope Infrastructure
//!
//! Adapters implementing the ports defined in `vitalscope-core`:
//! - Key-value stores (in-memory, JSON files, SQLite)
//! - Telemetry sinks (tracing, HTTP)
//! - A channel-backed performance entry source
//! - Configuration loading from files and the environment
//!
//! All I/O lives here. `vitalscope-core` never touches the filesystem, the
//! network or a database directly.

pub mod config;
pub mod database;
pub mod errors;
pub mod observer;
pub mod storage;
pub mod telemetry;

pub use database::DbManager;
pub use errors::InfraError;
pub use observer::ChannelEntrySource;
pub use storage::{
    build_store, FileKeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore,
};
pub use telemetry::{build_sink, HttpTelemetrySink, TracingTelemetrySink};
