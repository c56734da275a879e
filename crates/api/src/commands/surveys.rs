//! Usability survey commands

use serde_json::Value;
use vitalscope_domain::Result;

use crate::context::AppContext;

pub async fn sus(context: &AppContext, answers: &[u8]) -> Result<Value> {
    Ok(serde_json::to_value(context.submit_sus(answers).await?)?)
}

pub async fn nps(context: &AppContext, score: u8, feedback: Option<String>) -> Result<Value> {
    Ok(serde_json::to_value(context.submit_nps(score, feedback).await?)?)
}

pub async fn summary(context: &AppContext) -> Result<Value> {
    Ok(serde_json::to_value(context.survey_summary().await)?)
}
