//! Usability survey results (SUS and NPS)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{SUS_EXCELLENT, SUS_GOOD, SUS_OKAY};
use crate::impl_domain_status_conversions;

/// Adjective grade for a System Usability Scale score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SusGrade {
    Excellent,
    Good,
    Okay,
    Poor,
}

impl_domain_status_conversions!(SusGrade {
    Excellent => "excellent",
    Good => "good",
    Okay => "okay",
    Poor => "poor",
});

impl SusGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= SUS_EXCELLENT {
            Self::Excellent
        } else if score >= SUS_GOOD {
            Self::Good
        } else if score >= SUS_OKAY {
            Self::Okay
        } else {
            Self::Poor
        }
    }
}

/// One completed SUS questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SusResult {
    pub id: Uuid,
    /// Ten answers on a 1..=5 scale, in question order
    pub answers: Vec<u8>,
    /// 0..=100
    pub score: f64,
    pub grade: SusGrade,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpsCategory {
    Promoter,
    Passive,
    Detractor,
}

impl_domain_status_conversions!(NpsCategory {
    Promoter => "promoter",
    Passive => "passive",
    Detractor => "detractor",
});

impl NpsCategory {
    pub fn from_score(score: u8) -> Self {
        match score {
            9.. => Self::Promoter,
            7 | 8 => Self::Passive,
            _ => Self::Detractor,
        }
    }
}

/// One Net Promoter Score response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpsResult {
    pub id: Uuid,
    pub score: u8,
    pub category: NpsCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SusSummary {
    pub count: usize,
    pub average_score: f64,
    pub grade: SusGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpsSummary {
    pub count: usize,
    pub promoters: usize,
    pub passives: usize,
    pub detractors: usize,
    /// Promoters minus detractors as a percentage of responses (-100..=100)
    pub nps: f64,
}
