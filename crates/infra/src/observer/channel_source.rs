//! Channel-backed performance entry source
//!
//! Entries are pushed in by the host (a JSONL file, an embedding webview
//! bridge) with [`ChannelEntrySource::publish`] and fanned out to every
//! subscriber of the entry's type.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};
use vitalscope_core::PerformanceEntrySource;
use vitalscope_domain::{EntryType, PerformanceEntry, Result, VitalScopeError};

#[derive(Debug)]
pub struct ChannelEntrySource {
    capacity: usize,
    supported: HashSet<EntryType>,
    subscribers: Mutex<HashMap<EntryType, Vec<mpsc::Sender<PerformanceEntry>>>>,
}

impl ChannelEntrySource {
    /// Source that supports every entry type
    pub fn new(capacity: usize) -> Self {
        Self::with_supported(capacity, EntryType::ALL)
    }

    /// Source limited to `supported`; other subscriptions fail
    pub fn with_supported(capacity: usize, supported: impl IntoIterator<Item = EntryType>) -> Self {
        Self {
            capacity: capacity.max(1),
            supported: supported.into_iter().collect(),
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// Deliver `entry` to every live subscriber of its type
    ///
    /// Waits when a subscriber's buffer is full. Returns how many subscribers
    /// received the entry.
    pub async fn publish(&self, entry: PerformanceEntry) -> usize {
        let entry_type = entry.entry_type();
        let senders = self.subscribers.lock().get(&entry_type).cloned().unwrap_or_default();

        let mut delivered = 0;
        for sender in &senders {
            if sender.send(entry.clone()).await.is_ok() {
                delivered += 1;
            }
        }

        if delivered < senders.len() {
            self.subscribers
                .lock()
                .entry(entry_type)
                .or_default()
                .retain(|sender| !sender.is_closed());
        }

        trace!(entry_type = %entry_type, delivered, "performance entry published");
        delivered
    }

    /// End every stream; subscribers see their channel close once drained
    pub fn close(&self) {
        let mut subscribers = self.subscribers.lock();
        let streams: usize = subscribers.values().map(Vec::len).sum();
        subscribers.clear();
        debug!(streams, "performance entry source closed");
    }

    pub fn subscriber_count(&self, entry_type: EntryType) -> usize {
        self.subscribers.lock().get(&entry_type).map_or(0, Vec::len)
    }
}

impl PerformanceEntrySource for ChannelEntrySource {
    fn subscribe(&self, entry_type: EntryType) -> Result<mpsc::Receiver<PerformanceEntry>> {
        if !self.supported.contains(&entry_type) {
            return Err(VitalScopeError::Observation(format!(
                "entry type '{entry_type}' is not supported by this source"
            )));
        }

        let (tx, rx) = mpsc::channel(self.capacity);
        self.subscribers.lock().entry(entry_type).or_default().push(tx);
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paint(name: &str, start_time: f64) -> PerformanceEntry {
        PerformanceEntry::Paint { name: name.to_string(), start_time }
    }

    #[tokio::test]
    async fn fans_out_to_matching_subscribers_only() {
        let source = ChannelEntrySource::new(4);
        let mut first = source.subscribe(EntryType::Paint).unwrap();
        let mut second = source.subscribe(EntryType::Paint).unwrap();
        let _other = source.subscribe(EntryType::LayoutShift).unwrap();

        assert_eq!(source.publish(paint("first-contentful-paint", 900.0)).await, 2);

        assert_eq!(first.recv().await, Some(paint("first-contentful-paint", 900.0)));
        assert_eq!(second.recv().await, Some(paint("first-contentful-paint", 900.0)));
    }

    #[tokio::test]
    async fn unsupported_type_fails_subscription() {
        let source = ChannelEntrySource::with_supported(4, [EntryType::Paint]);
        let err = source.subscribe(EntryType::Event).unwrap_err();
        assert!(matches!(err, VitalScopeError::Observation(_)));
    }

    #[tokio::test]
    async fn dropped_receivers_are_pruned() {
        let source = ChannelEntrySource::new(4);
        drop(source.subscribe(EntryType::Paint).unwrap());
        let _kept = source.subscribe(EntryType::Paint).unwrap();

        assert_eq!(source.publish(paint("first-paint", 10.0)).await, 1);
        assert_eq!(source.subscriber_count(EntryType::Paint), 1);
    }

    #[tokio::test]
    async fn close_ends_streams_after_buffered_entries() {
        let source = ChannelEntrySource::new(4);
        let mut rx = source.subscribe(EntryType::Paint).unwrap();

        source.publish(paint("first-contentful-paint", 1.0)).await;
        source.close();

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }
}
