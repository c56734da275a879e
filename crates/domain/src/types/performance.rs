//! Performance timeline entries
//!
//! The shapes mirror what a browser performance observer delivers, reduced to
//! the fields the Web Vitals trackers read. Times are milliseconds relative to
//! navigation start.

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Entry stream a subscriber can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    Paint,
    LargestContentfulPaint,
    LayoutShift,
    Event,
    Navigation,
}

impl_domain_status_conversions!(EntryType {
    Paint => "paint",
    LargestContentfulPaint => "largest-contentful-paint",
    LayoutShift => "layout-shift",
    Event => "event",
    Navigation => "navigation",
});

impl EntryType {
    pub const ALL: [EntryType; 5] = [
        Self::Paint,
        Self::LargestContentfulPaint,
        Self::LayoutShift,
        Self::Event,
        Self::Navigation,
    ];
}

/// A single performance timeline entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry_type", rename_all = "kebab-case")]
pub enum PerformanceEntry {
    /// `first-paint` or `first-contentful-paint`
    Paint { name: String, start_time: f64 },
    LargestContentfulPaint {
        start_time: f64,
        #[serde(default)]
        render_time: Option<f64>,
        #[serde(default)]
        load_time: Option<f64>,
    },
    LayoutShift {
        value: f64,
        #[serde(default)]
        had_recent_input: bool,
    },
    /// Event timing; only entries with an interaction id count towards INP
    Event {
        name: String,
        duration: f64,
        #[serde(default)]
        interaction_id: Option<u64>,
    },
    Navigation { request_start: f64, response_start: f64 },
}

impl PerformanceEntry {
    pub fn entry_type(&self) -> EntryType {
        match self {
            Self::Paint { .. } => EntryType::Paint,
            Self::LargestContentfulPaint { .. } => EntryType::LargestContentfulPaint,
            Self::LayoutShift { .. } => EntryType::LayoutShift,
            Self::Event { .. } => EntryType::Event,
            Self::Navigation { .. } => EntryType::Navigation,
        }
    }
}
