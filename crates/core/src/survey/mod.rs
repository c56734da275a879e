//! Usability surveys (SUS and NPS)

pub mod service;

pub use service::{sus_score, SurveyService};
