//! Web Vitals names, thresholds and ratings

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CLS_GOOD, CLS_POOR, FCP_GOOD_MS, FCP_POOR_MS, INP_GOOD_MS, INP_POOR_MS, LCP_GOOD_MS,
    LCP_POOR_MS, TTFB_GOOD_MS, TTFB_POOR_MS,
};
use crate::impl_domain_status_conversions;

/// The five tracked Web Vitals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VitalName {
    /// Largest Contentful Paint (ms)
    Lcp,
    /// Cumulative Layout Shift (unitless)
    Cls,
    /// Interaction to Next Paint (ms)
    Inp,
    /// First Contentful Paint (ms)
    Fcp,
    /// Time to First Byte (ms)
    Ttfb,
}

impl VitalName {
    pub const ALL: [VitalName; 5] = [Self::Lcp, Self::Cls, Self::Inp, Self::Fcp, Self::Ttfb];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lcp => "LCP",
            Self::Cls => "CLS",
            Self::Inp => "INP",
            Self::Fcp => "FCP",
            Self::Ttfb => "TTFB",
        }
    }

    pub fn thresholds(self) -> VitalThresholds {
        let (good, needs_improvement) = match self {
            Self::Lcp => (LCP_GOOD_MS, LCP_POOR_MS),
            Self::Cls => (CLS_GOOD, CLS_POOR),
            Self::Inp => (INP_GOOD_MS, INP_POOR_MS),
            Self::Fcp => (FCP_GOOD_MS, FCP_POOR_MS),
            Self::Ttfb => (TTFB_GOOD_MS, TTFB_POOR_MS),
        };
        VitalThresholds { good, needs_improvement }
    }

    /// Rate a value against this vital's thresholds
    pub fn classify(self, value: f64) -> VitalStatus {
        self.thresholds().classify(value)
    }
}

impl fmt::Display for VitalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|vital| vital.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid VitalName: {}", s))
    }
}

/// Upper bounds (inclusive) for the `good` and `needs_improvement` ratings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalThresholds {
    pub good: f64,
    pub needs_improvement: f64,
}

impl VitalThresholds {
    pub fn classify(&self, value: f64) -> VitalStatus {
        if value <= self.good {
            VitalStatus::Good
        } else if value <= self.needs_improvement {
            VitalStatus::NeedsImprovement
        } else {
            VitalStatus::Poor
        }
    }
}

/// Rating of a single vital
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalStatus {
    Good,
    NeedsImprovement,
    Poor,
}

impl_domain_status_conversions!(VitalStatus {
    Good => "good",
    NeedsImprovement => "needs_improvement",
    Poor => "poor",
});

/// Latest value per vital, last write wins
pub type WebVitalsSnapshot = BTreeMap<VitalName, f64>;
