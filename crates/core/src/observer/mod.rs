//! Web Vitals observation

pub mod ports;
pub mod service;
mod trackers;

pub use ports::PerformanceEntrySource;
pub use service::{ObserverHandle, WebVitalsObserver};
