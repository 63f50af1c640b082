//! Attrition risk: the local rule-based classifier, the external predictor
//! seam, and the bulk fan-out that aggregates predictions into a histogram.

mod bulk;
mod classifier;
pub mod gemini;
mod predictor;

pub use bulk::{BulkAnalysisError, BulkRiskAnalyzer, RiskHistogram};
pub use classifier::{classify, AttritionRisk};
pub use gemini::GeminiRiskPredictor;
pub use predictor::{
    predict_for_detail, render_prompt, AttritionPrediction, HeuristicRiskPredictor, PredictionError,
    RiskPredictor,
};
