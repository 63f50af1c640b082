use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::predictor::{render_prompt, AttritionPrediction, PredictionError, RiskPredictor};
use crate::config::AttritionConfig;
use crate::workflows::workforce::domain::Employee;

const SYSTEM_INSTRUCTION: &str = "You are an expert HR analyst specializing in predictive workforce analytics. Your task is to assess an employee's likelihood of leaving the company (attrition risk) based on the data provided. Respond only with the JSON object as defined by the schema.";

/// Thin wrapper around the Gemini `generateContent` endpoint.
pub struct GeminiRiskPredictor {
    client: reqwest::Client,
    config: AttritionConfig,
}

impl GeminiRiskPredictor {
    pub fn new(config: AttritionConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: AttritionConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(&self, employee: &Employee) -> serde_json::Value {
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": render_prompt(employee) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": self.config.temperature,
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "risk": {
                            "type": "STRING",
                            "description": "The predicted attrition risk level. Must be one of: Low, Medium, High.",
                            "enum": ["Low", "Medium", "High"]
                        },
                        "reason": {
                            "type": "STRING",
                            "description": "A concise, data-driven explanation for the predicted risk level, based on the employee's data."
                        },
                        "recommendations": {
                            "type": "STRING",
                            "description": "Three actionable, bullet-pointed recommendations for HR or the manager to mitigate this risk."
                        }
                    },
                    "required": ["risk", "reason", "recommendations"]
                }
            }
        })
    }
}

impl std::fmt::Debug for GeminiRiskPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiRiskPredictor")
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RiskPredictor for GeminiRiskPredictor {
    async fn predict(&self, employee: &Employee) -> Result<AttritionPrediction, PredictionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(PredictionError::NotConfigured)?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(employee))
            .send()
            .await
            .map_err(|err| PredictionError::Transport(err.to_string()))?
            .error_for_status()
            .map_err(|err| PredictionError::Transport(err.to_string()))?;

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| PredictionError::Parse(err.to_string()))?;

        parse_prediction(&payload)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

fn parse_prediction(payload: &GenerateContentResponse) -> Result<AttritionPrediction, PredictionError> {
    let text = payload
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .find_map(|part| part.text.as_deref())
        .ok_or_else(|| PredictionError::Parse("response carried no text part".to_string()))?;

    serde_json::from_str(text.trim()).map_err(|err| PredictionError::Parse(err.to_string()))
}
