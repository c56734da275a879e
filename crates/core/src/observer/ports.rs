//! Port interface for performance timeline sources

use tokio::sync::mpsc;
use vitalscope_domain::{EntryType, PerformanceEntry, Result};

/// Source of performance timeline entries, one stream per entry type
///
/// Subscribing to an entry type the source cannot observe returns
/// `VitalScopeError::Observation`. A stream ends when the source stops
/// producing that entry type.
pub trait PerformanceEntrySource: Send + Sync {
    fn subscribe(&self, entry_type: EntryType) -> Result<mpsc::Receiver<PerformanceEntry>>;
}
