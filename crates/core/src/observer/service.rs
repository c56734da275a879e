//! Web Vitals observer - feeds performance entry streams into the collector

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vitalscope_domain::{PerformanceEntry, VitalName};

use super::ports::PerformanceEntrySource;
use super::trackers::{all_trackers, VitalTracker};
use crate::collector::MetricsCollector;

/// Subscribes to one entry stream per vital and records each new value
pub struct WebVitalsObserver {
    collector: Arc<MetricsCollector>,
}

impl WebVitalsObserver {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }

    /// Start observing every vital `source` can deliver
    ///
    /// Each subscription is attempted on its own: a vital whose entry type
    /// can't be observed is logged and listed in
    /// [`ObserverHandle::failed_vitals`] while the others keep running.
    /// Must be called from within a tokio runtime.
    pub fn observe(&self, source: &dyn PerformanceEntrySource) -> ObserverHandle {
        let mut tasks = Vec::new();
        let mut failed = Vec::new();

        for tracker in all_trackers() {
            let vital = tracker.vital();
            match source.subscribe(tracker.entry_type()) {
                Ok(entries) => {
                    debug!(vital = %vital, entry_type = %tracker.entry_type(), "Observing web vital");
                    tasks.push(tokio::spawn(track(tracker, entries, Arc::clone(&self.collector))));
                }
                Err(err) => {
                    warn!(vital = %vital, error = %err, "Web vital observation unavailable");
                    failed.push(vital);
                }
            }
        }

        ObserverHandle { tasks, failed }
    }
}

async fn track(
    mut tracker: Box<dyn VitalTracker>,
    mut entries: mpsc::Receiver<PerformanceEntry>,
    collector: Arc<MetricsCollector>,
) {
    let vital = tracker.vital();
    while let Some(entry) = entries.recv().await {
        let Some(value) = tracker.observe(&entry) else {
            continue;
        };

        if let Err(err) = collector.record_web_vital(vital, value).await {
            warn!(vital = %vital, value, error = %err, "Failed to record web vital");
        }
    }
    debug!(vital = %vital, "Performance entry stream closed");
}

/// Running observation tasks
///
/// Dropping the handle leaves the tasks running until their streams close.
#[derive(Debug)]
pub struct ObserverHandle {
    tasks: Vec<JoinHandle<()>>,
    failed: Vec<VitalName>,
}

impl ObserverHandle {
    /// Vitals whose subscription failed
    pub fn failed_vitals(&self) -> &[VitalName] {
        &self.failed
    }

    /// Number of vitals being observed
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait until every entry stream has closed
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    warn!(error = %err, "Web vital tracker task failed");
                }
            }
        }
    }

    /// Stop observing immediately
    pub fn shutdown(self) {
        for task in &self.tasks {
            task.abort();
        }
        debug!(tasks = self.tasks.len(), "Web vitals observer shut down");
    }
}
