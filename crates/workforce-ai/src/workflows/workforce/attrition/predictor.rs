use std::fmt::Write as _;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::classifier::{classify, AttritionRisk};
use crate::workflows::workforce::domain::Employee;

/// Structured answer returned by the risk-prediction collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttritionPrediction {
    pub risk: AttritionRisk,
    pub reason: String,
    /// Newline separated bullet items, each optionally prefixed with `- `.
    pub recommendations: String,
}

impl AttritionPrediction {
    pub fn recommendation_items(&self) -> Vec<String> {
        self.recommendations
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let trimmed = line.trim();
                trimmed.strip_prefix("- ").unwrap_or(trimmed).to_string()
            })
            .collect()
    }

    /// Shown by the detail view when the collaborator call fails.
    pub fn analysis_failed() -> Self {
        Self {
            risk: AttritionRisk::High,
            reason: "An error occurred while analyzing the data. Could not determine risk."
                .to_string(),
            recommendations: "Please check the API configuration and try again.".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("risk prediction service is not configured")]
    NotConfigured,
    #[error("risk prediction transport failed: {0}")]
    Transport(String),
    #[error("risk prediction response could not be parsed: {0}")]
    Parse(String),
}

/// Seam for the external, non-deterministic risk predictor.
#[async_trait]
pub trait RiskPredictor: Send + Sync {
    async fn predict(&self, employee: &Employee) -> Result<AttritionPrediction, PredictionError>;
}

/// Offline predictor backed by the rule-based classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRiskPredictor;

#[async_trait]
impl RiskPredictor for HeuristicRiskPredictor {
    async fn predict(&self, employee: &Employee) -> Result<AttritionPrediction, PredictionError> {
        let risk = classify(employee.satisfaction_score, employee.performance_rating);
        let (reason, recommendations) = match risk {
            AttritionRisk::High => (
                "Satisfaction or performance is at a level that usually precedes a resignation.",
                "- Schedule a one-on-one this week\n- Review workload and compensation\n- Agree on a short development plan",
            ),
            AttritionRisk::Medium => (
                "Satisfaction or performance is middling and worth watching.",
                "- Check in at the next review\n- Discuss growth opportunities\n- Recognize recent contributions",
            ),
            AttritionRisk::Low => (
                "Satisfaction and performance are both healthy.",
                "- Keep regular check-ins\n- Offer stretch projects\n- Consider for mentoring roles",
            ),
        };
        Ok(AttritionPrediction {
            risk,
            reason: format!(
                "{reason} Satisfaction {}/10, performance {}/5.",
                employee.satisfaction_score, employee.performance_rating
            ),
            recommendations: recommendations.to_string(),
        })
    }
}

/// Single-employee lookup used by the detail view.
///
/// Returns `None` when no predictor is configured and the fixed High/error
/// triple for any other failure.
pub async fn predict_for_detail<P>(predictor: &P, employee: &Employee) -> Option<AttritionPrediction>
where
    P: RiskPredictor + ?Sized,
{
    match predictor.predict(employee).await {
        Ok(prediction) => Some(prediction),
        Err(PredictionError::NotConfigured) => {
            warn!(employee_id = employee.id, "risk predictor not configured");
            None
        }
        Err(err) => {
            warn!(employee_id = employee.id, error = %err, "risk prediction failed");
            Some(AttritionPrediction::analysis_failed())
        }
    }
}

/// Employee summary handed to the collaborator.
pub fn render_prompt(employee: &Employee) -> String {
    let mut prompt = String::new();
    prompt.push_str("Analyze the following employee data and predict their attrition risk.\n");
    prompt.push_str("Provide a concise reason and actionable recommendations.\n\n");
    let _ = writeln!(prompt, "- Name: {}", employee.name);
    let _ = writeln!(prompt, "- Role: {}", employee.role);
    let _ = writeln!(prompt, "- Department: {}", employee.department.label());
    let _ = writeln!(prompt, "- Salary: ${}", group_thousands(employee.salary));
    let _ = writeln!(prompt, "- Start Date: {}", employee.start_date);
    let _ = writeln!(
        prompt,
        "- Performance Rating (1-5): {}",
        employee.performance_rating
    );
    let _ = writeln!(
        prompt,
        "- Job Satisfaction Score (1-10): {}",
        employee.satisfaction_score
    );
    let _ = writeln!(prompt, "- Projects Completed: {}", employee.projects_completed);
    let _ = writeln!(prompt, "- Last Performance Review: {}", employee.last_review_date);
    prompt
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
