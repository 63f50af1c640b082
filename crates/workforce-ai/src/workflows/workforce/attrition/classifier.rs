use serde::{Deserialize, Serialize};

/// Coarse likelihood that an employee resigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttritionRisk {
    Low,
    Medium,
    High,
}

impl AttritionRisk {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

const HIGH_RISK_SATISFACTION: u8 = 4;
const HIGH_RISK_PERFORMANCE: u8 = 2;
const MEDIUM_RISK_SATISFACTION: u8 = 6;
const MEDIUM_RISK_PERFORMANCE: u8 = 3;

/// Rule-based tier from satisfaction (1-10) and performance (1-5).
///
/// Rules are evaluated top to bottom and the first match wins, so a low
/// satisfaction score is High risk regardless of performance.
pub fn classify(satisfaction: u8, performance: u8) -> AttritionRisk {
    if satisfaction <= HIGH_RISK_SATISFACTION || performance <= HIGH_RISK_PERFORMANCE {
        AttritionRisk::High
    } else if satisfaction <= MEDIUM_RISK_SATISFACTION || performance <= MEDIUM_RISK_PERFORMANCE {
        AttritionRisk::Medium
    } else {
        AttritionRisk::Low
    }
}
