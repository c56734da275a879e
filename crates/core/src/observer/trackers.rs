//! Per-vital reducers from performance entries to vital values

use vitalscope_domain::{EntryType, PerformanceEntry, VitalName};

const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

/// Turns a stream of entries into successive values of one vital
pub(crate) trait VitalTracker: Send {
    fn vital(&self) -> VitalName;

    fn entry_type(&self) -> EntryType;

    /// New value of the vital after `entry`, if it changed
    fn observe(&mut self, entry: &PerformanceEntry) -> Option<f64>;
}

/// One tracker per vital
pub(crate) fn all_trackers() -> Vec<Box<dyn VitalTracker>> {
    vec![
        Box::new(LcpTracker),
        Box::new(FcpTracker),
        Box::new(ClsTracker::default()),
        Box::new(InpTracker::default()),
        Box::new(TtfbTracker),
    ]
}

/// Every candidate replaces the previous one
struct LcpTracker;

impl VitalTracker for LcpTracker {
    fn vital(&self) -> VitalName {
        VitalName::Lcp
    }

    fn entry_type(&self) -> EntryType {
        EntryType::LargestContentfulPaint
    }

    fn observe(&mut self, entry: &PerformanceEntry) -> Option<f64> {
        match entry {
            PerformanceEntry::LargestContentfulPaint { start_time, render_time, load_time } => {
                Some(render_time.or(*load_time).unwrap_or(*start_time))
            }
            _ => None,
        }
    }
}

struct FcpTracker;

impl VitalTracker for FcpTracker {
    fn vital(&self) -> VitalName {
        VitalName::Fcp
    }

    fn entry_type(&self) -> EntryType {
        EntryType::Paint
    }

    fn observe(&mut self, entry: &PerformanceEntry) -> Option<f64> {
        match entry {
            PerformanceEntry::Paint { name, start_time } if name == FIRST_CONTENTFUL_PAINT => {
                Some(*start_time)
            }
            _ => None,
        }
    }
}

/// Running sum of shifts not caused by user input
#[derive(Default)]
struct ClsTracker {
    total: f64,
}

impl VitalTracker for ClsTracker {
    fn vital(&self) -> VitalName {
        VitalName::Cls
    }

    fn entry_type(&self) -> EntryType {
        EntryType::LayoutShift
    }

    fn observe(&mut self, entry: &PerformanceEntry) -> Option<f64> {
        match entry {
            PerformanceEntry::LayoutShift { value, had_recent_input: false } => {
                self.total += value;
                Some(self.total)
            }
            _ => None,
        }
    }
}

/// Longest interaction seen so far
#[derive(Default)]
struct InpTracker {
    longest: Option<f64>,
}

impl VitalTracker for InpTracker {
    fn vital(&self) -> VitalName {
        VitalName::Inp
    }

    fn entry_type(&self) -> EntryType {
        EntryType::Event
    }

    fn observe(&mut self, entry: &PerformanceEntry) -> Option<f64> {
        let PerformanceEntry::Event { duration, interaction_id: Some(_), .. } = entry else {
            return None;
        };

        if self.longest.is_some_and(|longest| *duration <= longest) {
            return None;
        }
        self.longest = Some(*duration);
        self.longest
    }
}

struct TtfbTracker;

impl VitalTracker for TtfbTracker {
    fn vital(&self) -> VitalName {
        VitalName::Ttfb
    }

    fn entry_type(&self) -> EntryType {
        EntryType::Navigation
    }

    fn observe(&mut self, entry: &PerformanceEntry) -> Option<f64> {
        match entry {
            PerformanceEntry::Navigation { request_start, response_start } => {
                Some((response_start - request_start).max(0.0))
            }
            _ => None,
        }
    }
}
