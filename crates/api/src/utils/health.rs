//! Health reporting for AppContext components

use serde::{Deserialize, Serialize};

/// Overall health status of the application
///
/// # Example
/// ```
/// use vitalscope_lib::utils::health::{ComponentHealth, HealthStatus};
///
/// let mut status = HealthStatus::new()
///     .add_component(ComponentHealth::healthy("storage"))
///     .add_component(ComponentHealth::unhealthy("collector", "3 events not persisted"));
/// status.calculate_score();
///
/// assert_eq!(status.score, 0.5);
/// assert!(!status.is_healthy);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub is_healthy: bool,

    /// Fraction of healthy components, from 0.0 to 1.0
    pub score: f64,

    pub message: Option<String>,

    pub components: Vec<ComponentHealth>,

    /// Unix timestamp (seconds) of the check
    pub timestamp: i64,
}

impl HealthStatus {
    /// Healthy with score 1.0 and no components
    pub fn new() -> Self {
        Self {
            is_healthy: true,
            score: 1.0,
            message: None,
            components: Vec::new(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.components.push(component);
        self
    }

    /// Score = healthy / total; healthy when every component is
    pub fn calculate_score(&mut self) {
        if self.components.is_empty() {
            return;
        }

        let unhealthy: Vec<&str> =
            self.components.iter().filter(|c| !c.is_healthy).map(|c| c.name.as_str()).collect();
        let healthy_count = self.components.len() - unhealthy.len();

        self.score = healthy_count as f64 / self.components.len() as f64;
        self.is_healthy = unhealthy.is_empty();
        self.message =
            (!unhealthy.is_empty()).then(|| format!("unhealthy: {}", unhealthy.join(", ")));
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Health status of an individual component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    pub message: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }
}
