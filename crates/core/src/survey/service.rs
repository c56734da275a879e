//! Survey service - scores, stores and summarizes SUS and NPS responses

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;
use vitalscope_common::stats::{mean, round2};
use vitalscope_common::time::Clock;
use vitalscope_domain::constants::{
    NPS_MAX_SCORE, NPS_STORAGE_KEY, SUS_QUESTION_COUNT, SUS_SCORE_MULTIPLIER, SUS_STORAGE_KEY,
};
use vitalscope_domain::{
    NpsCategory, NpsResult, NpsSummary, Result, SusGrade, SusResult, SusSummary, VitalScopeError,
};

use crate::collector::KeyValueStore;

/// System Usability Scale score (0..=100) for ten answers on a 1..=5 scale
///
/// Odd-numbered questions are positively worded and contribute `answer - 1`,
/// even-numbered ones contribute `5 - answer`.
pub fn sus_score(answers: &[u8]) -> Result<f64> {
    if answers.len() != SUS_QUESTION_COUNT {
        return Err(VitalScopeError::InvalidInput(format!(
            "SUS requires {} answers, got {}",
            SUS_QUESTION_COUNT,
            answers.len()
        )));
    }
    if let Some(bad) = answers.iter().find(|answer| !(1..=5).contains(*answer)) {
        return Err(VitalScopeError::InvalidInput(format!(
            "SUS answers must be between 1 and 5, got {}",
            bad
        )));
    }

    let raw: u32 = answers
        .iter()
        .enumerate()
        .map(|(index, &answer)| {
            let answer = u32::from(answer);
            if index % 2 == 0 {
                answer - 1
            } else {
                5 - answer
            }
        })
        .sum();

    Ok(f64::from(raw) * SUS_SCORE_MULTIPLIER)
}

/// Records survey responses next to the metric history
pub struct SurveyService {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SurveyService {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn submit_sus(&self, answers: &[u8]) -> Result<SusResult> {
        let score = sus_score(answers)?;
        let result = SusResult {
            id: Uuid::now_v7(),
            answers: answers.to_vec(),
            score,
            grade: SusGrade::from_score(score),
            timestamp: self.clock.now_millis(),
        };

        self.append(SUS_STORAGE_KEY, &result).await?;
        info!(score, grade = %result.grade, "SUS response recorded");
        Ok(result)
    }

    pub async fn submit_nps(&self, score: u8, feedback: Option<String>) -> Result<NpsResult> {
        if score > NPS_MAX_SCORE {
            return Err(VitalScopeError::InvalidInput(format!(
                "NPS score must be between 0 and {}, got {}",
                NPS_MAX_SCORE, score
            )));
        }

        let result = NpsResult {
            id: Uuid::now_v7(),
            score,
            category: NpsCategory::from_score(score),
            feedback: feedback.filter(|text| !text.trim().is_empty()),
            timestamp: self.clock.now_millis(),
        };

        self.append(NPS_STORAGE_KEY, &result).await?;
        info!(score, category = %result.category, "NPS response recorded");
        Ok(result)
    }

    pub async fn sus_results(&self) -> Vec<SusResult> {
        self.load(SUS_STORAGE_KEY).await
    }

    pub async fn nps_results(&self) -> Vec<NpsResult> {
        self.load(NPS_STORAGE_KEY).await
    }

    pub async fn sus_summary(&self) -> Option<SusSummary> {
        let scores: Vec<f64> = self.sus_results().await.iter().map(|result| result.score).collect();
        let average = round2(mean(&scores)?);
        Some(SusSummary { count: scores.len(), average_score: average, grade: SusGrade::from_score(average) })
    }

    pub async fn nps_summary(&self) -> Option<NpsSummary> {
        let results = self.nps_results().await;
        if results.is_empty() {
            return None;
        }

        let count_of =
            |category: NpsCategory| results.iter().filter(|result| result.category == category).count();
        let promoters = count_of(NpsCategory::Promoter);
        let passives = count_of(NpsCategory::Passive);
        let detractors = count_of(NpsCategory::Detractor);
        let count = results.len();
        let nps = round2((promoters as f64 - detractors as f64) / count as f64 * 100.0);

        Some(NpsSummary { count, promoters, passives, detractors, nps })
    }

    /// Append to the stored array, keeping entries this version can't parse
    ///
    /// An unreadable stored value is replaced.
    async fn append<T: Serialize>(&self, key: &str, result: &T) -> Result<()> {
        let entry = serde_json::to_value(result)?;
        let key_name = key.to_string();
        self.store
            .update(
                key,
                Box::new(move |existing| {
                    let mut entries: Vec<Value> = match existing.as_deref() {
                        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|err| {
                            warn!(key = %key_name, error = %err, "Replacing unreadable survey results");
                            Vec::new()
                        }),
                        None => Vec::new(),
                    };
                    entries.push(entry);
                    Ok(serde_json::to_string(&entries)?)
                }),
            )
            .await
    }

    /// Stored results; entries that don't parse are skipped
    async fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(key, error = %err, "Failed to read survey results");
                return Vec::new();
            }
        };

        let entries: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(key, error = %err, "Stored survey results are unreadable");
                return Vec::new();
            }
        };

        let total = entries.len();
        let results: Vec<T> =
            entries.into_iter().filter_map(|entry| serde_json::from_value(entry).ok()).collect();
        if results.len() < total {
            warn!(key, skipped = total - results.len(), "Skipped unreadable survey results");
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_possible_answers_score_100() {
        assert_eq!(sus_score(&[5, 1, 5, 1, 5, 1, 5, 1, 5, 1]).unwrap(), 100.0);
    }

    #[test]
    fn worst_possible_answers_score_0() {
        assert_eq!(sus_score(&[1, 5, 1, 5, 1, 5, 1, 5, 1, 5]).unwrap(), 0.0);
    }

    #[test]
    fn neutral_answers_score_50() {
        assert_eq!(sus_score(&[3; 10]).unwrap(), 50.0);
    }

    #[test]
    fn rejects_wrong_count_and_range() {
        assert!(matches!(sus_score(&[3; 9]), Err(VitalScopeError::InvalidInput(_))));
        assert!(matches!(sus_score(&[0, 3, 3, 3, 3, 3, 3, 3, 3, 3]), Err(VitalScopeError::InvalidInput(_))));
        assert!(matches!(sus_score(&[6, 3, 3, 3, 3, 3, 3, 3, 3, 3]), Err(VitalScopeError::InvalidInput(_))));
    }
}
