//! Elementary sample statistics
//!
//! Percentiles use the nearest-rank method on an ascending sort:
//! `index = ceil(p / 100 * n) - 1`, clamped to the sample bounds. There is no
//! interpolation. [`median`] is defined as the 50th percentile so the two can
//! never disagree.
//!
//! Every aggregate returns `None` for an empty sample set instead of failing.
//!
//! # Examples
//!
//! ```
//! use vitalscope_common::stats::{mean, median, percentile, round2};
//!
//! let samples = [1200.0, 1800.0, 2600.0, 3100.0];
//! assert_eq!(mean(&samples), Some(2175.0));
//! assert_eq!(median(&samples), Some(1800.0));
//! assert_eq!(percentile(&samples, 95.0), Some(3100.0));
//! assert_eq!(round2(-33.333_333), -33.33);
//! ```

use serde::{Deserialize, Serialize};

/// Arithmetic mean of the samples
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Nearest-rank percentile (`p` in `0.0..=100.0`)
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let rank = (p / 100.0 * n as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, n as i64 - 1) as usize;

    sorted.get(index).copied()
}

/// Median as the 50th nearest-rank percentile
pub fn median(samples: &[f64]) -> Option<f64> {
    percentile(samples, 50.0)
}

/// Round to two decimal places (half away from zero)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format with exactly two decimals, e.g. `6.0 -> "6.00"`
pub fn format_fixed2(value: f64) -> String {
    format!("{:.2}", round2(value))
}

/// Summary of a sample set
///
/// Used for ad-hoc performance timings where only the shape of the
/// distribution matters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub average: f64,
    /// 50th percentile
    pub median: f64,
    /// 95th percentile
    pub p95: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
}

impl SampleSummary {
    /// Summarise the samples, `None` when empty
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let average = mean(samples)?;
        let median = median(samples)?;
        let p95 = percentile(samples, 95.0)?;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self { count: samples.len(), average, median, p95, min, max })
    }
}
